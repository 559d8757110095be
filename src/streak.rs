//! Day-resolution goal streak.
//!
//! A day counts when calories reach the goal and, if one is set, protein
//! reaches its goal too. A missed day does not zero the streak until an
//! evaluation sees more than one day since the last success, so a late entry
//! for yesterday can still keep it alive.

use time::Date;

use crate::meals::DailyStats;
use crate::profile::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_success: Option<Date>,
}

/// What the caller must write back after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakWrite {
    /// Nothing changed.
    None,
    /// Write `current`, `longest` and `last_success`.
    Full,
    /// Write `current` only; `last_success` keeps the last good day.
    ResetCurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    pub state: StreakState,
    pub write: StreakWrite,
}

pub fn goals_met(stats: &DailyStats, profile: &UserProfile) -> bool {
    let met_calories = stats.total_calories >= profile.daily_calorie_goal;
    let met_protein = profile
        .daily_protein_goal
        .map_or(true, |goal| stats.total_protein >= goal);
    met_calories && met_protein
}

pub fn evaluate(state: StreakState, today: Date, goals_met: bool) -> StreakOutcome {
    let gap = state.last_success.map(|last| (today - last).whole_days());
    let mut next = state;

    if goals_met {
        match gap {
            Some(0) => {}
            Some(1) => next.current += 1,
            Some(d) if d > 1 => next.current = 1,
            // last success lies after `today`; counts stay as they are
            Some(_) => {}
            None => next.current = 1,
        }
        next.longest = next.longest.max(next.current);
        next.last_success = Some(today);
        return StreakOutcome {
            state: next,
            write: StreakWrite::Full,
        };
    }

    match gap {
        Some(d) if d > 1 => {
            next.current = 0;
            StreakOutcome {
                state: next,
                write: StreakWrite::ResetCurrent,
            }
        }
        _ => StreakOutcome {
            state: next,
            write: StreakWrite::None,
        },
    }
}

pub fn streak_message(current: u32) -> &'static str {
    match current {
        0 => "Start your streak today!",
        1 => "Great start!",
        2..=6 => "Keep it going!",
        7..=29 => "You're on fire!",
        _ => "Incredible dedication!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2026-10-14);

    fn state(current: u32, longest: u32, last: Option<Date>) -> StreakState {
        StreakState {
            current,
            longest,
            last_success: last,
        }
    }

    #[test]
    fn first_success_starts_at_one() {
        let out = evaluate(StreakState::default(), TODAY, true);
        assert_eq!(out.state, state(1, 1, Some(TODAY)));
        assert_eq!(out.write, StreakWrite::Full);
    }

    #[test]
    fn consecutive_day_increments_by_one() {
        let out = evaluate(state(4, 9, Some(date!(2026-10-13))), TODAY, true);
        assert_eq!(out.state.current, 5);
        assert_eq!(out.state.longest, 9);
        assert_eq!(out.state.last_success, Some(TODAY));
    }

    #[test]
    fn longest_follows_current_when_exceeded() {
        let out = evaluate(state(9, 9, Some(date!(2026-10-13))), TODAY, true);
        assert_eq!(out.state.current, 10);
        assert_eq!(out.state.longest, 10);
    }

    #[test]
    fn same_day_is_idempotent() {
        let before = state(3, 5, Some(TODAY));
        let out = evaluate(before, TODAY, true);
        assert_eq!(out.state, before);
        assert_eq!(out.write, StreakWrite::Full);
    }

    #[test]
    fn gap_resets_to_one_on_success() {
        let out = evaluate(state(6, 6, Some(date!(2026-10-11))), TODAY, true);
        assert_eq!(out.state.current, 1);
        assert_eq!(out.state.longest, 6);
    }

    #[test]
    fn missed_day_inside_grace_window_is_untouched() {
        let before = state(6, 8, Some(date!(2026-10-13)));
        let out = evaluate(before, TODAY, false);
        assert_eq!(out.state, before);
        assert_eq!(out.write, StreakWrite::None);
    }

    #[test]
    fn missed_day_after_gap_resets_to_zero() {
        let last = date!(2026-10-11);
        let out = evaluate(state(6, 8, Some(last)), TODAY, false);
        assert_eq!(out.state.current, 0);
        assert_eq!(out.state.longest, 8);
        assert_eq!(out.state.last_success, Some(last));
        assert_eq!(out.write, StreakWrite::ResetCurrent);
    }

    #[test]
    fn missed_day_without_history_writes_nothing() {
        let out = evaluate(StreakState::default(), TODAY, false);
        assert_eq!(out.state, StreakState::default());
        assert_eq!(out.write, StreakWrite::None);
    }

    #[test]
    fn longest_never_decreases() {
        let lasts = [None, Some(TODAY), Some(date!(2026-10-13)), Some(date!(2026-09-01))];
        for last in lasts {
            for met in [true, false] {
                let before = state(2, 12, last);
                let out = evaluate(before, TODAY, met);
                assert!(out.state.longest >= before.longest);
            }
        }
    }

    #[test]
    fn messages_by_length() {
        assert_eq!(streak_message(0), "Start your streak today!");
        assert_eq!(streak_message(1), "Great start!");
        assert_eq!(streak_message(6), "Keep it going!");
        assert_eq!(streak_message(7), "You're on fire!");
        assert_eq!(streak_message(29), "You're on fire!");
        assert_eq!(streak_message(30), "Incredible dedication!");
    }

    fn day(calories: f64, protein: f64) -> DailyStats {
        DailyStats {
            date: TODAY,
            total_calories: calories,
            total_protein: protein,
            total_fats: 0.0,
            total_carbohydrates: 0.0,
            meals: Vec::new(),
        }
    }

    fn profile(calorie_goal: f64, protein_goal: Option<f64>) -> UserProfile {
        UserProfile {
            email: "a@b.io".into(),
            body_weight: 70.0,
            daily_calorie_goal: calorie_goal,
            daily_protein_goal: protein_goal,
            target_monthly_weight_change: None,
            current_streak: 0,
            longest_streak: 0,
            last_streak_date: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn goals_met_at_exact_goal() {
        assert!(goals_met(&day(2000.0, 0.0), &profile(2000.0, None)));
        assert!(!goals_met(&day(1999.9, 0.0), &profile(2000.0, None)));
    }

    #[test]
    fn protein_goal_only_counts_when_set() {
        assert!(goals_met(&day(2100.0, 150.0), &profile(2000.0, Some(150.0))));
        assert!(!goals_met(&day(2100.0, 149.0), &profile(2000.0, Some(150.0))));
        assert!(goals_met(&day(2100.0, 0.0), &profile(2000.0, None)));
    }
}
