use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};

use crate::dates::iso_date;
use crate::streak::StreakState;

/// Stored as the single `profile/current` document of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    /// kg
    pub body_weight: f64,
    /// kcal
    pub daily_calorie_goal: f64,
    /// g
    #[serde(default)]
    pub daily_protein_goal: Option<f64>,
    /// kg per month, negative to lose
    #[serde(default)]
    pub target_monthly_weight_change: Option<f64>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default, with = "iso_date::option")]
    pub last_streak_date: Option<Date>,
    #[serde(with = "crate::dates::timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "crate::dates::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl UserProfile {
    pub fn streak_state(&self) -> StreakState {
        StreakState {
            current: self.current_streak,
            longest: self.longest_streak,
            last_success: self.last_streak_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub body_weight: f64,
    pub daily_calorie_goal: f64,
    #[serde(default)]
    pub daily_protein_goal: Option<f64>,
    #[serde(default)]
    pub target_monthly_weight_change: Option<f64>,
}

/// Absent fields are left alone; an explicit `null` clears an optional goal.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub body_weight: Option<f64>,
    #[serde(default)]
    pub daily_calorie_goal: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub daily_protein_goal: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub target_monthly_weight_change: Option<Option<f64>>,
}

fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct StreakRequest {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakReport {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub goals_met: bool,
    pub message: &'static str,
    #[serde(with = "iso_date::option")]
    pub last_streak_date: Option<Date>,
}

/// Write-back after a successful day.
#[derive(Debug, Serialize)]
pub(crate) struct StreakPatch {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(with = "iso_date::option")]
    pub last_streak_date: Option<Date>,
    #[serde(with = "crate::dates::timestamp")]
    pub updated_at: OffsetDateTime,
}

/// Write-back when a gap breaks the streak.
#[derive(Debug, Serialize)]
pub(crate) struct StreakResetPatch {
    pub current_streak: u32,
    #[serde(with = "crate::dates::timestamp")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub(crate) struct Touch {
    #[serde(with = "crate::dates::timestamp")]
    pub updated_at: OffsetDateTime,
}
