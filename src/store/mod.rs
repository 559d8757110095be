//! Per-user document collections.
//!
//! Every call is scoped by the owning user's id. Bodies are JSON objects;
//! `update` merges top-level keys the way a document database patch does.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

pub mod collections {
    pub const RECIPES: &str = "recipes";
    pub const MEAL_LOGS: &str = "meal_logs";
    pub const PROFILE: &str = "profile";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,

    #[error("patch must be a JSON object")]
    InvalidPatch,

    #[error("invalid field name {0:?}")]
    InvalidField(String),

    #[error("document encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    pub fn decode<T: DeserializeOwned>(self) -> Result<(String, T), StoreError> {
        let value = serde_json::from_value(self.body)?;
        Ok((self.id, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[cfg(test)]
    Ascending,
    Descending,
}

/// Filter and ordering for `list`. Field values are compared as JSON
/// scalars; ordering by an RFC 3339 timestamp field sorts chronologically.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub field_eq: Option<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.field_eq = Some((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, owner: Uuid, collection: &str, body: Value)
        -> Result<String, StoreError>;
    async fn put(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError>;
    async fn get(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;
    async fn list(
        &self,
        owner: Uuid,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Document>, StoreError>;
    async fn update(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<(), StoreError>;
    async fn delete(&self, owner: Uuid, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(value)?)
}

/// Applies a shallow patch: each top-level key of `patch` replaces the key
/// in `target`.
pub(crate) fn merge_patch(target: &mut Value, patch: Value) -> Result<(), StoreError> {
    let Value::Object(fields) = patch else {
        return Err(StoreError::InvalidPatch);
    };
    match target {
        Value::Object(existing) => {
            for (k, v) in fields {
                existing.insert(k, v);
            }
            Ok(())
        }
        _ => {
            *target = Value::Object(fields);
            Ok(())
        }
    }
}
