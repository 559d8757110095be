use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::dates::iso_date;
use crate::nutrition::Nutrients;

/// Stored body of a meal log. `nutrients` is fixed at log time and is not
/// rederived when the recipe changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLogDoc {
    pub recipe_id: String,
    pub recipe_name: String,
    /// grams
    pub mass: f64,
    pub nutrients: Nutrients,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "crate::dates::timestamp")]
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealLog {
    pub id: String,
    #[serde(flatten)]
    pub doc: MealLogDoc,
}

#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    #[serde(default)]
    pub recipe_id: String,
    #[serde(default)]
    pub mass: Option<f64>,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_fats: f64,
    pub total_carbohydrates: f64,
    /// Most recent first.
    pub meals: Vec<MealLog>,
}

impl DailyStats {
    pub fn totals(&self) -> Nutrients {
        Nutrients {
            calories: self.total_calories,
            protein: self.total_protein,
            fats: self.total_fats,
            carbohydrates: self.total_carbohydrates,
        }
    }
}

/// Energy from each macro, in kcal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroEnergy {
    pub protein: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub today: DailyStats,
    pub week: Vec<DailyStats>,
    pub daily_calorie_goal: f64,
    pub daily_protein_goal: Option<f64>,
    /// percent of the calorie goal
    pub calorie_progress: f64,
    /// negative once over the goal
    pub remaining_calories: f64,
    pub protein_progress: Option<f64>,
    pub macro_energy: MacroEnergy,
    pub goals_met: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_request_accepts_missing_fields() {
        let req: LogMealRequest = serde_json::from_str(r#"{"recipe_id": "r1"}"#).unwrap();
        assert_eq!(req.recipe_id, "r1");
        assert_eq!(req.mass, None);
        assert_eq!(req.date, None);

        let req: LogMealRequest =
            serde_json::from_str(r#"{"recipe_id": "r1", "mass": 250, "date": "2026-10-14"}"#)
                .unwrap();
        assert_eq!(req.mass, Some(250.0));
        assert_eq!(req.date, Some(time::macros::date!(2026-10-14)));
    }
}
