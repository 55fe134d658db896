use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use stockroom_core::{DocumentId, SortDirection};

/// A stored document: opaque id plus JSON body.
///
/// The id is assigned by the store on `create` and is not part of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub body: JsonValue,
}

/// Document store operation error.
///
/// These are **infrastructure errors** (storage, serialization) as opposed
/// to domain errors. Callers get no finer taxonomy than this: a failed call
/// is logged and propagated, never retried or swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {collection}/{id}")]
    NotFound {
        collection: String,
        id: DocumentId,
    },

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: DocumentId) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Collection-scoped document storage.
///
/// ## Contract
///
/// - Each call is atomic; there is no multi-call transaction support.
/// - Reads issued after a successful write on the same handle observe it
///   (strong consistency per handle).
/// - `update` performs a **shallow field merge**: top-level fields in the
///   patch replace or extend the stored body; absent fields are untouched.
/// - `delete` of a missing id is a no-op at the store level; callers must
///   not rely on either behavior.
/// - `list_ordered_by` orders by a top-level body field; documents missing
///   the field compare lowest, so they lead ascending listings and trail
///   descending ones. Field values compare store-style:
///   null < bool < number < string.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its store-assigned id.
    async fn create(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError>;

    /// Fetch one document by id.
    async fn get(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// All documents whose top-level `field` equals `value`.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>, StoreError>;

    /// Shallow-merge `patch` into the stored body. Fails with `NotFound`
    /// if the id does not exist.
    async fn update(
        &self,
        collection: &str,
        id: DocumentId,
        patch: JsonValue,
    ) -> Result<(), StoreError>;

    /// Remove a document by id (no-op for missing ids).
    async fn delete(&self, collection: &str, id: DocumentId) -> Result<(), StoreError>;

    /// All documents in the collection, ordered by a top-level body field.
    async fn list_ordered_by(
        &self,
        collection: &str,
        field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError>;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn create(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        (**self).create(collection, body).await
    }

    async fn get(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query_by_field(collection, field, value).await
    }

    async fn update(
        &self,
        collection: &str,
        id: DocumentId,
        patch: JsonValue,
    ) -> Result<(), StoreError> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: DocumentId) -> Result<(), StoreError> {
        (**self).delete(collection, id).await
    }

    async fn list_ordered_by(
        &self,
        collection: &str,
        field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).list_ordered_by(collection, field, direction).await
    }
}
