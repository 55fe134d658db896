//! Infrastructure layer: document storage and the inventory repository.

pub mod document_store;
pub mod repository;

pub use document_store::{
    Document, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StoreError,
};
pub use repository::{INVENTORY_COLLECTION, InventoryRepository, UpsertOutcome};
