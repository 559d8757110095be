use time::{Date, Duration, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{DailyStats, DashboardSummary, LogMealRequest, MacroEnergy, MealLog, MealLogDoc};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::nutrition::Nutrients;
use crate::profile::services::get_profile;
use crate::recipes::services::get_recipe;
use crate::store::DocumentStore;
use crate::streak::{goals_met, streak_message};

const WEEK_DAYS: i64 = 7;

/// Snapshots the recipe's per-100 g profile scaled to the eaten mass.
/// `today` is used when the request carries no date.
#[instrument(skip(store, req), fields(recipe_id = %req.recipe_id))]
pub async fn log_meal(
    store: &dyn DocumentStore,
    owner: Uuid,
    req: LogMealRequest,
    today: Date,
) -> AppResult<MealLog> {
    let recipe_id = req.recipe_id.trim();
    if recipe_id.is_empty() {
        return Err(AppError::validation("Please select a recipe"));
    }
    let recipe = get_recipe(store, owner, recipe_id).await?;

    let mass = req.mass.unwrap_or_else(|| recipe.doc.total_mass());
    if !mass.is_finite() || mass <= 0.0 {
        return Err(AppError::validation("Please enter a valid amount"));
    }

    let doc = MealLogDoc {
        recipe_id: recipe.id,
        recipe_name: recipe.doc.name().to_string(),
        mass,
        nutrients: recipe.doc.nutrients_per_100g().scaled_to(mass),
        date: req.date.unwrap_or(today),
        logged_at: OffsetDateTime::now_utc(),
    };
    let id = repo::insert(store, owner, &doc).await?;
    info!(%owner, meal_id = %id, date = %doc.date, "meal logged");
    Ok(MealLog { id, doc })
}

pub async fn delete_meal(store: &dyn DocumentStore, owner: Uuid, id: &str) -> AppResult<()> {
    if !repo::exists(store, owner, id).await? {
        return Err(AppError::NotFound("meal"));
    }
    repo::delete(store, owner, id).await?;
    info!(%owner, meal_id = %id, "meal deleted");
    Ok(())
}

pub fn summarize(date: Date, meals: Vec<MealLog>) -> DailyStats {
    let mut total = Nutrients::ZERO;
    for meal in &meals {
        total += meal.doc.nutrients;
    }
    DailyStats {
        date,
        total_calories: total.calories,
        total_protein: total.protein,
        total_fats: total.fats,
        total_carbohydrates: total.carbohydrates,
        meals,
    }
}

pub async fn daily_stats(store: &dyn DocumentStore, owner: Uuid, date: Date) -> AppResult<DailyStats> {
    let meals = repo::list_for_date(store, owner, date).await?;
    Ok(summarize(date, meals))
}

/// Seven days ending at `end`, oldest first.
pub async fn weekly_stats(
    store: &dyn DocumentStore,
    owner: Uuid,
    end: Date,
) -> AppResult<Vec<DailyStats>> {
    let mut week = Vec::with_capacity(WEEK_DAYS as usize);
    for back in (0..WEEK_DAYS).rev() {
        let day = end - Duration::days(back);
        week.push(daily_stats(store, owner, day).await?);
    }
    Ok(week)
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn macro_energy(totals: Nutrients) -> MacroEnergy {
    MacroEnergy {
        protein: totals.protein * 4.0,
        fats: totals.fats * 9.0,
        carbohydrates: totals.carbohydrates * 4.0,
    }
}

#[instrument(skip(store))]
pub async fn dashboard(
    store: &dyn DocumentStore,
    owner: Uuid,
    date: Date,
) -> AppResult<DashboardSummary> {
    let profile = get_profile(store, owner).await?;
    let week = weekly_stats(store, owner, date).await?;
    // the last entry of the week is `date` itself
    let today = week[week.len() - 1].clone();

    let calorie_goal = profile.daily_calorie_goal;
    Ok(DashboardSummary {
        calorie_progress: percent(today.total_calories, calorie_goal),
        remaining_calories: calorie_goal - today.total_calories,
        protein_progress: profile
            .daily_protein_goal
            .map(|goal| percent(today.total_protein, goal)),
        macro_energy: macro_energy(today.totals()),
        goals_met: goals_met(&today, &profile),
        current_streak: profile.current_streak,
        longest_streak: profile.longest_streak,
        streak_message: streak_message(profile.current_streak),
        daily_calorie_goal: calorie_goal,
        daily_protein_goal: profile.daily_protein_goal,
        today,
        week,
    })
}
