use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{merge_patch, Direction, Document, DocumentStore, ListQuery, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    body: Value,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    docs: HashMap<(Uuid, String), HashMap<String, Entry>>,
}

/// Process-local store, used by tests and `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(
        &self,
        owner: Uuid,
        collection: &str,
        body: Value,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.put(owner, collection, &id, body).await?;
        Ok(id)
    }

    async fn put(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;
        let docs = inner
            .docs
            .entry((owner, collection.to_string()))
            .or_default();
        // replacing keeps the first insertion position
        let seq = docs.get(id).map_or(seq, |e| e.seq);
        docs.insert(id.to_string(), Entry { seq, body });
        Ok(())
    }

    async fn get(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        let doc = inner
            .docs
            .get(&(owner, collection.to_string()))
            .and_then(|docs| docs.get(id))
            .map(|e| Document {
                id: id.to_string(),
                body: e.body.clone(),
            });
        Ok(doc)
    }

    async fn list(
        &self,
        owner: Uuid,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        let Some(docs) = inner.docs.get(&(owner, collection.to_string())) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<(&String, &Entry)> = docs
            .iter()
            .filter(|(_, e)| match &query.field_eq {
                Some((field, value)) => e.body.get(field) == Some(value),
                None => true,
            })
            .collect();
        rows.sort_by_key(|(_, e)| e.seq);
        if let Some((field, direction)) = &query.order_by {
            rows.sort_by(|(_, a), (_, b)| {
                let ord = compare_field(&a.body, &b.body, field);
                match direction {
                    #[cfg(test)]
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        Ok(rows
            .into_iter()
            .map(|(id, e)| Document {
                id: id.clone(),
                body: e.body.clone(),
            })
            .collect())
    }

    async fn update(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .docs
            .get_mut(&(owner, collection.to_string()))
            .and_then(|docs| docs.get_mut(id))
            .ok_or(StoreError::NotFound)?;
        merge_patch(&mut entry.body, patch)
    }

    async fn delete(&self, owner: Uuid, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(docs) = inner.docs.get_mut(&(owner, collection.to_string())) {
            docs.remove(id);
        }
        Ok(())
    }
}
