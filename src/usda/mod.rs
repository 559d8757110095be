//! USDA FoodData Central lookup.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::UsdaConfig;
use crate::nutrition::Nutrients;

mod cache;
mod dto;

pub use cache::IngredientCache;
use dto::{FdcFood, SearchResponse};

/// FDC nutrient numbers.
pub mod nutrient_ids {
    pub const ENERGY_KCAL: u32 = 1008;
    pub const PROTEIN: u32 = 1003;
    pub const FAT: u32 = 1004;
    pub const CARBOHYDRATE: u32 = 1005;
}

const SEARCH_DATA_TYPES: &str = "Foundation,SR Legacy,Survey (FNDDS)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub fdc_id: u64,
    pub description: String,
    /// Per 100 g.
    pub nutrients: Nutrients,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_unit: Option<String>,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("USDA API key is not configured")]
    MissingApiKey,

    #[error("USDA API rate limit exceeded")]
    RateLimited,

    #[error("USDA API responded with {0}")]
    Status(StatusCode),

    #[error("USDA API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct UsdaClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl UsdaClient {
    pub fn new(config: &UsdaConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            page_size: config.page_size,
        })
    }

    fn api_key(&self) -> Result<&str, LookupError> {
        self.api_key.as_deref().ok_or(LookupError::MissingApiKey)
    }

    /// Ranked candidates for free-text `query`. Every hit is cached.
    #[instrument(skip(self, cache))]
    pub async fn search(
        &self,
        cache: &IngredientCache,
        query: &str,
    ) -> Result<Vec<Ingredient>, LookupError> {
        let key = self.api_key()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let page_size = self.page_size.to_string();
        let res = self
            .http
            .get(format!("{}/foods/search", self.base_url))
            .query(&[
                ("api_key", key),
                ("query", query),
                ("dataType", SEARCH_DATA_TYPES),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        match res.status() {
            s if s.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(LookupError::RateLimited),
            s => {
                warn!(status = %s, "usda search failed");
                return Err(LookupError::Status(s));
            }
        }

        let body: SearchResponse = res.json().await?;
        debug!(hits = body.total_hits, returned = body.foods.len(), "usda search");

        let ingredients: Vec<Ingredient> = body.foods.into_iter().map(to_ingredient).collect();
        for ingredient in &ingredients {
            cache.insert(ingredient.clone());
        }
        Ok(ingredients)
    }

    /// Full record for one food; `None` when FDC does not know the id.
    #[instrument(skip(self, cache))]
    pub async fn fetch_by_id(
        &self,
        cache: &IngredientCache,
        fdc_id: u64,
    ) -> Result<Option<Ingredient>, LookupError> {
        if let Some(hit) = cache.get(fdc_id) {
            debug!(fdc_id, "ingredient cache hit");
            return Ok(Some(hit));
        }
        let key = self.api_key()?;

        let res = self
            .http
            .get(format!("{}/food/{}", self.base_url, fdc_id))
            .query(&[("api_key", key)])
            .send()
            .await?;

        match res.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::TOO_MANY_REQUESTS => return Err(LookupError::RateLimited),
            s => {
                warn!(status = %s, fdc_id, "usda detail failed");
                return Err(LookupError::Status(s));
            }
        }

        let food: FdcFood = res.json().await?;
        let ingredient = to_ingredient(food);
        cache.insert(ingredient.clone());
        Ok(Some(ingredient))
    }
}

fn to_ingredient(food: FdcFood) -> Ingredient {
    let mut nutrients = Nutrients::ZERO;
    for n in &food.food_nutrients {
        let value = n.per_100g();
        match n.id() {
            Some(nutrient_ids::ENERGY_KCAL) => nutrients.calories = value,
            Some(nutrient_ids::PROTEIN) => nutrients.protein = value,
            Some(nutrient_ids::FAT) => nutrients.fats = value,
            Some(nutrient_ids::CARBOHYDRATE) => nutrients.carbohydrates = value,
            _ => {}
        }
    }

    let (serving_size, serving_unit) = serving_hint(&food);
    Ingredient {
        fdc_id: food.fdc_id,
        description: food.description,
        nutrients,
        serving_size,
        serving_unit,
    }
}

fn serving_hint(food: &FdcFood) -> (Option<f64>, Option<String>) {
    if let (Some(size), Some(unit)) = (food.serving_size, food.serving_size_unit.as_ref()) {
        return (Some(size), Some(unit.clone()));
    }

    // prefer a household measure over the "100 g" reference portion
    let portion = food
        .food_portions
        .iter()
        .find(|p| {
            let named = p
                .modifier
                .as_deref()
                .is_some_and(|m| !m.is_empty() && !m.to_lowercase().contains("100"));
            named && p.gram_weight.is_some_and(|g| g > 0.0)
        })
        .or_else(|| food.food_portions.first());

    match portion {
        Some(p) => match p.gram_weight.filter(|g| *g > 0.0) {
            Some(grams) => {
                let unit = p
                    .modifier
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "serving".to_string());
                (Some(grams), Some(unit))
            }
            None => (None, None),
        },
        None => (None, None),
    }
}
