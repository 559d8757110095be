use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::nutrition::{aggregate, Nutrients};
use crate::usda::Ingredient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    /// grams
    pub mass: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

/// Stored body of a recipe.
///
/// The totals are derived from `ingredients` and only ever set by
/// [`RecipeDoc::new`], so a stored recipe always carries its own
/// recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDoc {
    name: String,
    ingredients: Vec<RecipeIngredient>,
    total_nutrients: Nutrients,
    total_mass: f64,
    nutrients_per_100g: Nutrients,
    #[serde(with = "crate::dates::timestamp")]
    created_at: OffsetDateTime,
    #[serde(with = "crate::dates::timestamp")]
    updated_at: OffsetDateTime,
}

impl RecipeDoc {
    pub fn new(name: String, ingredients: Vec<RecipeIngredient>, now: OffsetDateTime) -> Self {
        let totals = aggregate(ingredients.iter().map(|i| (&i.ingredient.nutrients, i.mass)));
        Self {
            name,
            ingredients,
            total_nutrients: totals.total_nutrients,
            total_mass: totals.total_mass,
            nutrients_per_100g: totals.nutrients_per_100g,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ingredients(&self) -> &[RecipeIngredient] {
        &self.ingredients
    }

    pub fn total_nutrients(&self) -> Nutrients {
        self.total_nutrients
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn nutrients_per_100g(&self) -> Nutrients {
        self.nutrients_per_100g
    }

    #[cfg(test)]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: String,
    #[serde(flatten)]
    pub doc: RecipeDoc,
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(calories: f64, protein: f64, mass: f64) -> RecipeIngredient {
        RecipeIngredient {
            ingredient: Ingredient {
                fdc_id: 1,
                description: "x".into(),
                nutrients: Nutrients {
                    calories,
                    protein,
                    fats: 0.0,
                    carbohydrates: 0.0,
                },
                serving_size: None,
                serving_unit: None,
            },
            mass,
            quantity: None,
        }
    }

    #[test]
    fn new_derives_totals() {
        let doc = RecipeDoc::new(
            "bowl".into(),
            vec![item(200.0, 10.0, 150.0), item(100.0, 2.0, 50.0)],
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(doc.total_mass(), 200.0);
        assert_eq!(doc.total_nutrients().calories, 350.0);
        assert_eq!(doc.nutrients_per_100g().calories, 175.0);
    }

    #[test]
    fn serialized_recipe_is_flat() {
        let recipe = Recipe {
            id: "r1".into(),
            doc: RecipeDoc::new("empty".into(), vec![], OffsetDateTime::UNIX_EPOCH),
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["id"], "r1");
        assert_eq!(json["name"], "empty");
        assert_eq!(json["total_mass"], 0.0);
        assert_eq!(json["created_at"], "1970-01-01T00:00:00.000000000+00:00");
    }
}
