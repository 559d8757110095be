use serde_json::{Map, Value};
use time::{Date, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{
    CreateProfileRequest, StreakPatch, StreakReport, StreakResetPatch, Touch,
    UpdateProfileRequest, UserProfile,
};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::meals::services::daily_stats;
use crate::store::{encode, DocumentStore};
use crate::streak::{evaluate, goals_met, streak_message, StreakWrite};

fn positive(value: f64, what: &str) -> AppResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::validation(format!("{what} must be a positive number")))
    }
}

fn finite(value: f64, what: &str) -> AppResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::validation(format!("{what} must be a number")))
    }
}

pub async fn create_profile(
    store: &dyn DocumentStore,
    owner: Uuid,
    email: String,
    req: CreateProfileRequest,
) -> AppResult<UserProfile> {
    let body_weight = positive(req.body_weight, "Body weight")?;
    let daily_calorie_goal = positive(req.daily_calorie_goal, "Daily calorie goal")?;
    let daily_protein_goal = req
        .daily_protein_goal
        .map(|g| positive(g, "Daily protein goal"))
        .transpose()?;
    let target_monthly_weight_change = req
        .target_monthly_weight_change
        .map(|c| finite(c, "Target monthly weight change"))
        .transpose()?;

    if repo::get(store, owner).await?.is_some() {
        return Err(AppError::Conflict("Profile already exists".into()));
    }

    let now = OffsetDateTime::now_utc();
    let profile = UserProfile {
        email,
        body_weight,
        daily_calorie_goal,
        daily_protein_goal,
        target_monthly_weight_change,
        current_streak: 0,
        longest_streak: 0,
        last_streak_date: None,
        created_at: now,
        updated_at: now,
    };
    repo::put(store, owner, &profile).await?;
    info!(%owner, "profile created");
    Ok(profile)
}

pub async fn get_profile(store: &dyn DocumentStore, owner: Uuid) -> AppResult<UserProfile> {
    repo::get(store, owner)
        .await?
        .ok_or(AppError::NotFound("profile"))
}

pub async fn update_profile(
    store: &dyn DocumentStore,
    owner: Uuid,
    req: UpdateProfileRequest,
) -> AppResult<UserProfile> {
    let mut patch = Map::new();
    if let Some(w) = req.body_weight {
        patch.insert("body_weight".into(), Value::from(positive(w, "Body weight")?));
    }
    if let Some(g) = req.daily_calorie_goal {
        patch.insert(
            "daily_calorie_goal".into(),
            Value::from(positive(g, "Daily calorie goal")?),
        );
    }
    if let Some(goal) = req.daily_protein_goal {
        let goal = goal.map(|g| positive(g, "Daily protein goal")).transpose()?;
        patch.insert("daily_protein_goal".into(), Value::from(goal));
    }
    if let Some(change) = req.target_monthly_weight_change {
        let change = change
            .map(|c| finite(c, "Target monthly weight change"))
            .transpose()?;
        patch.insert("target_monthly_weight_change".into(), Value::from(change));
    }

    // make sure it exists before touching it, so the caller gets a 404
    get_profile(store, owner).await?;
    if !patch.is_empty() {
        let touch = encode(&Touch {
            updated_at: OffsetDateTime::now_utc(),
        })?;
        if let Value::Object(fields) = touch {
            patch.extend(fields);
        }
        repo::patch(store, owner, &Value::Object(patch)).await?;
    }
    get_profile(store, owner).await
}

/// Runs the streak tracker for `date` against that day's logged meals and
/// writes back whatever it changed. `date` may not lie after `today`.
pub async fn evaluate_streak(
    store: &dyn DocumentStore,
    owner: Uuid,
    date: Date,
    today: Date,
) -> AppResult<StreakReport> {
    if date > today {
        warn!(%owner, %date, %today, "streak evaluation for a future day");
        return Err(AppError::validation("Cannot evaluate a day in the future"));
    }
    let profile = get_profile(store, owner).await?;
    if profile.last_streak_date.is_some_and(|last| date < last) {
        warn!(%owner, %date, "streak evaluation before last streak day");
        return Err(AppError::validation(
            "Cannot evaluate a day before the last streak day",
        ));
    }

    let stats = daily_stats(store, owner, date).await?;
    let met = goals_met(&stats, &profile);
    let outcome = evaluate(profile.streak_state(), date, met);
    let now = OffsetDateTime::now_utc();

    match outcome.write {
        StreakWrite::Full => {
            repo::patch(
                store,
                owner,
                &StreakPatch {
                    current_streak: outcome.state.current,
                    longest_streak: outcome.state.longest,
                    last_streak_date: outcome.state.last_success,
                    updated_at: now,
                },
            )
            .await?;
        }
        StreakWrite::ResetCurrent => {
            repo::patch(
                store,
                owner,
                &StreakResetPatch {
                    current_streak: 0,
                    updated_at: now,
                },
            )
            .await?;
            info!(%owner, %date, "streak broken");
        }
        StreakWrite::None => {}
    }

    Ok(StreakReport {
        current_streak: outcome.state.current,
        longest_streak: outcome.state.longest,
        goals_met: met,
        message: streak_message(outcome.state.current),
        last_streak_date: outcome.state.last_success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::dto::LogMealRequest;
    use crate::meals::services::log_meal;
    use crate::nutrition::Nutrients;
    use crate::recipes::dto::RecipeIngredient;
    use crate::recipes::services::create_recipe;
    use crate::store::MemoryDocumentStore;
    use crate::usda::Ingredient;
    use time::macros::date;

    const TODAY: Date = date!(2026-10-31);

    fn request(protein_goal: Option<f64>) -> CreateProfileRequest {
        CreateProfileRequest {
            body_weight: 72.0,
            daily_calorie_goal: 2000.0,
            daily_protein_goal: protein_goal,
            target_monthly_weight_change: Some(-1.0),
        }
    }

    /// A recipe of 100 g with exactly `calories` kcal and `protein` g.
    async fn recipe(store: &dyn DocumentStore, owner: Uuid, calories: f64, protein: f64) -> String {
        let ingredient = Ingredient {
            fdc_id: 1,
            description: "test food".into(),
            nutrients: Nutrients {
                calories,
                protein,
                fats: 0.0,
                carbohydrates: 0.0,
            },
            serving_size: None,
            serving_unit: None,
        };
        create_recipe(
            store,
            owner,
            "block".into(),
            vec![RecipeIngredient {
                ingredient,
                mass: 100.0,
                quantity: None,
            }],
        )
        .await
        .unwrap()
        .id
    }

    async fn eat(store: &dyn DocumentStore, owner: Uuid, recipe_id: &str, day: Date) {
        log_meal(
            store,
            owner,
            LogMealRequest {
                recipe_id: recipe_id.into(),
                mass: None,
                date: Some(day),
            },
            day,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_bad_values() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();

        let mut bad = request(None);
        bad.daily_calorie_goal = 0.0;
        let err = create_profile(&store, owner, "a@b.io".into(), bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let profile = create_profile(&store, owner, "a@b.io".into(), request(None))
            .await
            .unwrap();
        assert_eq!(profile.current_streak, 0);
        assert_eq!(profile.last_streak_date, None);

        let err = create_profile(&store, owner, "a@b.io".into(), request(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        create_profile(&store, owner, "a@b.io".into(), request(Some(120.0)))
            .await
            .unwrap();

        let updated = update_profile(
            &store,
            owner,
            UpdateProfileRequest {
                daily_calorie_goal: Some(2200.0),
                daily_protein_goal: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.daily_calorie_goal, 2200.0);
        assert_eq!(updated.daily_protein_goal, None);
        assert_eq!(updated.body_weight, 72.0);
        assert_eq!(updated.target_monthly_weight_change, Some(-1.0));
    }

    #[tokio::test]
    async fn update_without_profile_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = update_profile(&store, Uuid::new_v4(), UpdateProfileRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("profile")));
    }

    #[tokio::test]
    async fn streak_builds_over_consecutive_days_and_breaks_after_gap() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        create_profile(&store, owner, "a@b.io".into(), request(Some(100.0)))
            .await
            .unwrap();
        let big = recipe(&store, owner, 2100.0, 120.0).await;

        eat(&store, owner, &big, date!(2026-10-12)).await;
        let r = evaluate_streak(&store, owner, date!(2026-10-12), TODAY).await.unwrap();
        assert_eq!((r.current_streak, r.longest_streak, r.goals_met), (1, 1, true));
        assert_eq!(r.message, "Great start!");

        eat(&store, owner, &big, date!(2026-10-13)).await;
        let r = evaluate_streak(&store, owner, date!(2026-10-13), TODAY).await.unwrap();
        assert_eq!((r.current_streak, r.longest_streak), (2, 2));

        // same day again changes nothing
        let r = evaluate_streak(&store, owner, date!(2026-10-13), TODAY).await.unwrap();
        assert_eq!((r.current_streak, r.longest_streak), (2, 2));

        // nothing eaten on the 14th: still inside the grace window
        let r = evaluate_streak(&store, owner, date!(2026-10-14), TODAY).await.unwrap();
        assert!(!r.goals_met);
        assert_eq!(r.current_streak, 2);

        // the 15th, still nothing: broken
        let r = evaluate_streak(&store, owner, date!(2026-10-15), TODAY).await.unwrap();
        assert_eq!((r.current_streak, r.longest_streak), (0, 2));

        let stored = get_profile(&store, owner).await.unwrap();
        assert_eq!(stored.current_streak, 0);
        assert_eq!(stored.longest_streak, 2);
        assert_eq!(stored.last_streak_date, Some(date!(2026-10-13)));
    }

    #[tokio::test]
    async fn protein_goal_must_be_met_too() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        create_profile(&store, owner, "a@b.io".into(), request(Some(150.0)))
            .await
            .unwrap();
        let low_protein = recipe(&store, owner, 2500.0, 40.0).await;
        eat(&store, owner, &low_protein, date!(2026-10-14)).await;

        let r = evaluate_streak(&store, owner, date!(2026-10-14), TODAY).await.unwrap();
        assert!(!r.goals_met);
        assert_eq!(r.current_streak, 0);
    }

    #[tokio::test]
    async fn evaluating_before_last_streak_day_is_rejected() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        create_profile(&store, owner, "a@b.io".into(), request(None))
            .await
            .unwrap();
        let big = recipe(&store, owner, 2100.0, 0.0).await;
        eat(&store, owner, &big, date!(2026-10-14)).await;
        evaluate_streak(&store, owner, date!(2026-10-14), TODAY).await.unwrap();

        let err = evaluate_streak(&store, owner, date!(2026-10-10), TODAY)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn future_day_is_rejected_and_keeps_streak() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        create_profile(&store, owner, "a@b.io".into(), request(None))
            .await
            .unwrap();
        let big = recipe(&store, owner, 2100.0, 0.0).await;
        eat(&store, owner, &big, date!(2026-10-13)).await;
        eat(&store, owner, &big, date!(2026-10-14)).await;
        evaluate_streak(&store, owner, date!(2026-10-13), date!(2026-10-14))
            .await
            .unwrap();
        evaluate_streak(&store, owner, date!(2026-10-14), date!(2026-10-14))
            .await
            .unwrap();

        let err = evaluate_streak(&store, owner, date!(2030-01-01), date!(2026-10-14))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = evaluate_streak(&store, owner, date!(2026-10-15), date!(2026-10-14))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot evaluate a day in the future");

        let stored = get_profile(&store, owner).await.unwrap();
        assert_eq!(stored.current_streak, 2);
        assert_eq!(stored.last_streak_date, Some(date!(2026-10-14)));
    }
}
