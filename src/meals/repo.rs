use time::Date;
use uuid::Uuid;

use super::dto::{MealLog, MealLogDoc};
use crate::dates::format_date;
use crate::store::{collections::MEAL_LOGS, encode, Direction, DocumentStore, ListQuery, StoreError};

pub async fn insert(store: &dyn DocumentStore, owner: Uuid, doc: &MealLogDoc) -> Result<String, StoreError> {
    store.create(owner, MEAL_LOGS, encode(doc)?).await
}

pub async fn exists(store: &dyn DocumentStore, owner: Uuid, id: &str) -> Result<bool, StoreError> {
    Ok(store.get(owner, MEAL_LOGS, id).await?.is_some())
}

/// Logs of one calendar day, most recent first.
pub async fn list_for_date(
    store: &dyn DocumentStore,
    owner: Uuid,
    date: Date,
) -> Result<Vec<MealLog>, StoreError> {
    let query = ListQuery::new()
        .where_eq("date", format_date(date))
        .order_by("logged_at", Direction::Descending);
    store
        .list(owner, MEAL_LOGS, &query)
        .await?
        .into_iter()
        .map(|d| d.decode::<MealLogDoc>().map(|(id, doc)| MealLog { id, doc }))
        .collect()
}

pub async fn delete(store: &dyn DocumentStore, owner: Uuid, id: &str) -> Result<(), StoreError> {
    store.delete(owner, MEAL_LOGS, id).await
}
