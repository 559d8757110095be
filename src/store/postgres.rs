use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{Direction, Document, DocumentStore, ListQuery, StoreError};

/// Documents kept in the `documents` table as JSONB, keyed by
/// `(owner_id, collection, id)`.
#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Collection and field names end up in the SQL text, so only plain
/// identifiers pass.
fn json_key(field: &str) -> Result<&str, StoreError> {
    let plain = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        Ok(field)
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

fn to_document((id, Json(body)): (String, Json<Value>)) -> Document {
    Document { id, body }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(
        &self,
        owner: Uuid,
        collection: &str,
        body: Value,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO documents (owner_id, collection, id, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(&id)
        .bind(Json(body))
        .execute(&self.db)
        .await?;
        debug!(%owner, collection, %id, "document created");
        Ok(id)
    }

    async fn put(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (owner_id, collection, id, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id, collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .bind(Json(body))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn get(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (String, Json<Value>)>(
            r#"
            SELECT id, body
              FROM documents
             WHERE owner_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(to_document))
    }

    async fn list(
        &self,
        owner: Uuid,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT id, body FROM documents WHERE owner_id = ");
        qb.push_bind(owner);
        // collection and keys are written inline so the planner can match
        // the partial expression indexes
        qb.push(format!(" AND collection = '{}'", json_key(collection)?));

        if let Some((field, value)) = &query.field_eq {
            qb.push(format!(" AND body -> '{}' = ", json_key(field)?));
            qb.push_bind(Json(value.clone()));
        }

        qb.push(" ORDER BY ");
        if let Some((field, direction)) = &query.order_by {
            qb.push(format!("body -> '{}'", json_key(field)?));
            qb.push(match direction {
                #[cfg(test)]
                Direction::Ascending => " ASC, ",
                Direction::Descending => " DESC, ",
            });
        }
        qb.push("created_at ASC");

        let rows = qb
            .build_query_as::<(String, Json<Value>)>()
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_document).collect())
    }

    async fn update(
        &self,
        owner: Uuid,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<(), StoreError> {
        if !patch.is_object() {
            return Err(StoreError::InvalidPatch);
        }
        let res = sqlx::query(
            r#"
            UPDATE documents
               SET body = body || $4, updated_at = now()
             WHERE owner_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .bind(Json(patch))
        .execute(&self.db)
        .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, owner: Uuid, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM documents
             WHERE owner_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(owner)
        .bind(collection)
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_key_accepts_plain_identifiers_only() {
        assert_eq!(json_key("logged_at").unwrap(), "logged_at");
        assert_eq!(json_key("date").unwrap(), "date");
        for bad in ["", "date'; DROP TABLE documents; --", "a-b", "body->x"] {
            assert!(matches!(json_key(bad), Err(StoreError::InvalidField(_))));
        }
    }
}
