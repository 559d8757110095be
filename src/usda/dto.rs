//! FoodData Central wire types. Only the fields we read are modelled.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<FdcFood>,
    #[serde(default)]
    pub total_hits: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcFood {
    pub fdc_id: u64,
    pub description: String,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub food_portions: Vec<FoodPortion>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPortion {
    pub gram_weight: Option<f64>,
    pub modifier: Option<String>,
}

/// Search results carry `nutrientId`/`value`; the detail endpoint nests the
/// id under `nutrient` and calls the value `amount`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    pub nutrient_id: Option<u32>,
    pub value: Option<f64>,
    pub nutrient: Option<NutrientRef>,
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct NutrientRef {
    pub id: u32,
}

impl FoodNutrient {
    pub fn id(&self) -> Option<u32> {
        self.nutrient_id.or_else(|| self.nutrient.as_ref().map(|n| n.id))
    }

    pub fn per_100g(&self) -> f64 {
        self.value.or(self.amount).unwrap_or(0.0)
    }
}
