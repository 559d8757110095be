use uuid::Uuid;

use super::dto::{Recipe, RecipeDoc};
use crate::store::{collections::RECIPES, encode, Direction, DocumentStore, ListQuery, StoreError};

pub async fn insert(store: &dyn DocumentStore, owner: Uuid, doc: &RecipeDoc) -> Result<String, StoreError> {
    store.create(owner, RECIPES, encode(doc)?).await
}

pub async fn get(store: &dyn DocumentStore, owner: Uuid, id: &str) -> Result<Option<Recipe>, StoreError> {
    let Some(found) = store.get(owner, RECIPES, id).await? else {
        return Ok(None);
    };
    let (id, doc) = found.decode::<RecipeDoc>()?;
    Ok(Some(Recipe { id, doc }))
}

/// Newest first.
pub async fn list(store: &dyn DocumentStore, owner: Uuid) -> Result<Vec<Recipe>, StoreError> {
    let query = ListQuery::new().order_by("created_at", Direction::Descending);
    store
        .list(owner, RECIPES, &query)
        .await?
        .into_iter()
        .map(|d| d.decode::<RecipeDoc>().map(|(id, doc)| Recipe { id, doc }))
        .collect()
}

/// Replaces everything but `created_at` in a single write, so the ingredient
/// list and its derived totals can never be stored apart.
pub async fn replace_content(
    store: &dyn DocumentStore,
    owner: Uuid,
    id: &str,
    doc: &RecipeDoc,
) -> Result<(), StoreError> {
    let mut patch = encode(doc)?;
    if let Some(fields) = patch.as_object_mut() {
        fields.remove("created_at");
    }
    store.update(owner, RECIPES, id, patch).await
}

pub async fn delete(store: &dyn DocumentStore, owner: Uuid, id: &str) -> Result<(), StoreError> {
    store.delete(owner, RECIPES, id).await
}
