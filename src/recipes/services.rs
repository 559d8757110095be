use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{Recipe, RecipeDoc, RecipeIngredient};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::store::DocumentStore;

fn validate(name: &str, ingredients: &[RecipeIngredient]) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Recipe name is required"));
    }
    for item in ingredients {
        if !item.mass.is_finite() || item.mass < 0.0 {
            return Err(AppError::validation(format!(
                "Invalid mass for {}",
                item.ingredient.description
            )));
        }
    }
    Ok(name.to_string())
}

#[instrument(skip(store, ingredients), fields(count = ingredients.len()))]
pub async fn create_recipe(
    store: &dyn DocumentStore,
    owner: Uuid,
    name: String,
    ingredients: Vec<RecipeIngredient>,
) -> AppResult<Recipe> {
    let name = validate(&name, &ingredients)?;
    let doc = RecipeDoc::new(name, ingredients, OffsetDateTime::now_utc());
    let id = repo::insert(store, owner, &doc).await?;
    info!(
        %owner,
        recipe_id = %id,
        ingredients = doc.ingredients().len(),
        calories = doc.total_nutrients().calories,
        "recipe created"
    );
    Ok(Recipe { id, doc })
}

pub async fn get_recipe(store: &dyn DocumentStore, owner: Uuid, id: &str) -> AppResult<Recipe> {
    repo::get(store, owner, id)
        .await?
        .ok_or(AppError::NotFound("recipe"))
}

pub async fn list_recipes(store: &dyn DocumentStore, owner: Uuid) -> AppResult<Vec<Recipe>> {
    Ok(repo::list(store, owner).await?)
}

#[instrument(skip(store, ingredients), fields(count = ingredients.len()))]
pub async fn update_recipe(
    store: &dyn DocumentStore,
    owner: Uuid,
    id: &str,
    name: String,
    ingredients: Vec<RecipeIngredient>,
) -> AppResult<Recipe> {
    let name = validate(&name, &ingredients)?;
    let doc = RecipeDoc::new(name, ingredients, OffsetDateTime::now_utc());
    repo::replace_content(store, owner, id, &doc)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => AppError::NotFound("recipe"),
            other => other,
        })?;
    get_recipe(store, owner, id).await
}

pub async fn delete_recipe(store: &dyn DocumentStore, owner: Uuid, id: &str) -> AppResult<()> {
    get_recipe(store, owner, id).await?;
    repo::delete(store, owner, id).await?;
    info!(%owner, recipe_id = %id, "recipe deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::Nutrients;
    use crate::store::{collections::RECIPES, MemoryDocumentStore};
    use crate::usda::Ingredient;

    fn item(description: &str, calories: f64, protein: f64, mass: f64) -> RecipeIngredient {
        RecipeIngredient {
            ingredient: Ingredient {
                fdc_id: 10,
                description: description.into(),
                nutrients: Nutrients {
                    calories,
                    protein,
                    fats: 5.0,
                    carbohydrates: 20.0,
                },
                serving_size: None,
                serving_unit: None,
            },
            mass,
            quantity: None,
        }
    }

    #[tokio::test]
    async fn stored_totals_match_ingredients() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        let created = create_recipe(
            &store,
            owner,
            "  Chili ".into(),
            vec![item("beans", 200.0, 10.0, 150.0), item("rice", 100.0, 2.0, 50.0)],
        )
        .await
        .unwrap();
        assert_eq!(created.doc.name(), "Chili");

        let raw = store
            .get(owner, RECIPES, &created.id)
            .await
            .unwrap()
            .unwrap()
            .body;
        assert_eq!(raw["total_nutrients"]["calories"], 350.0);
        assert_eq!(raw["total_mass"], 200.0);
        assert_eq!(raw["nutrients_per_100g"]["calories"], 175.0);
    }

    #[tokio::test]
    async fn update_recomputes_and_keeps_created_at() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        let created = create_recipe(&store, owner, "Soup".into(), vec![item("a", 50.0, 1.0, 100.0)])
            .await
            .unwrap();

        let updated = update_recipe(
            &store,
            owner,
            &created.id,
            "Thick soup".into(),
            vec![item("a", 50.0, 1.0, 100.0), item("b", 150.0, 3.0, 100.0)],
        )
        .await
        .unwrap();

        assert_eq!(updated.doc.name(), "Thick soup");
        assert_eq!(updated.doc.ingredients().len(), 2);
        assert_eq!(updated.doc.total_mass(), 200.0);
        assert_eq!(updated.doc.total_nutrients().calories, 200.0);
        assert_eq!(updated.doc.nutrients_per_100g().calories, 100.0);
        assert_eq!(updated.doc.created_at(), created.doc.created_at());
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();

        let err = create_recipe(&store, owner, "   ".into(), vec![]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create_recipe(&store, owner, "x".into(), vec![item("oil", 884.0, 0.0, -5.0)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid mass for oil");

        let err = create_recipe(&store, owner, "x".into(), vec![item("oil", 884.0, 0.0, f64::NAN)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_recipe_is_allowed_and_zero() {
        let store = MemoryDocumentStore::new();
        let r = create_recipe(&store, Uuid::new_v4(), "Water".into(), vec![])
            .await
            .unwrap();
        assert_eq!(r.doc.total_mass(), 0.0);
        assert_eq!(r.doc.nutrients_per_100g(), Nutrients::ZERO);
    }

    #[tokio::test]
    async fn missing_recipe_is_not_found() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        let err = update_recipe(&store, owner, "nope", "x".into(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("recipe")));
        let err = delete_recipe(&store, owner, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("recipe")));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        let first = create_recipe(&store, owner, "first".into(), vec![]).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = create_recipe(&store, owner, "second".into(), vec![]).await.unwrap();

        let ids: Vec<_> = list_recipes(&store, owner)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
