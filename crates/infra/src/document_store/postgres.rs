//! Postgres-backed document store implementation.
//!
//! Documents live in a single `documents` table with a `jsonb` body, one row
//! per document, partitioned logically by the `collection` column. Shallow
//! field merges use the jsonb `||` operator, and field-ordered listings sort
//! on the extracted text of the requested body field.

use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use stockroom_core::{DocumentId, SortDirection};

use super::r#trait::{Document, DocumentStore, StoreError};

/// Postgres-backed document store.
///
/// ## Thread safety
///
/// Uses the SQLx connection pool, which is thread-safe and cheap to clone.
/// Each operation is a single statement, so per-call atomicity comes from
/// Postgres itself; no explicit transactions are needed.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Wrap an existing pool. Call [`Self::ensure_schema`] before first use.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and create the schema if it is missing.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `documents` table and its collection index if absent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT  NOT NULL,
                id         UUID  PRIMARY KEY,
                body       JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents (collection)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{operation}: {err}"))
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode id", e))?;
    let body: JsonValue = row
        .try_get("body")
        .map_err(|e| map_sqlx_error("decode body", e))?;

    Ok(Document {
        id: DocumentId::from_uuid(id),
        body,
    })
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, body), err)]
    async fn create(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new();

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.as_uuid())
            .bind(&body)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create", e))?;

        debug!(collection, %id, "created document");
        Ok(id)
    }

    async fn get(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT id, body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body -> $2 = $3
            ORDER BY id
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("query_by_field", e))?;

        rows.iter().map(row_to_document).collect()
    }

    #[instrument(skip(self, patch), err)]
    async fn update(
        &self,
        collection: &str,
        id: DocumentId,
        patch: JsonValue,
    ) -> Result<(), StoreError> {
        if !patch.is_object() {
            return Err(StoreError::Serialization(
                "update patch must be a JSON object".to_string(),
            ));
        }

        let result =
            sqlx::query("UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id.as_uuid())
                .bind(&patch)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, collection: &str, id: DocumentId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(())
    }

    async fn list_ordered_by(
        &self,
        collection: &str,
        field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        // Only the direction keyword is interpolated; it comes from an enum,
        // never from caller input. The field name stays a bound parameter.
        // Rows missing the field extract to NULL; pin them to the low end
        // so both backends order identically.
        let order = match direction {
            SortDirection::Ascending => "ASC NULLS FIRST",
            SortDirection::Descending => "DESC NULLS LAST",
        };
        let sql = format!(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY body ->> $2 {order}"
        );

        let rows = sqlx::query(&sql)
            .bind(collection)
            .bind(field)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_ordered_by", e))?;

        rows.iter().map(row_to_document).collect()
    }
}
