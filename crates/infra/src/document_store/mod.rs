//! Document store boundary.
//!
//! This module defines an infrastructure-facing abstraction for a managed
//! document database (create/read/update/delete by id, query-by-field,
//! order-by-field) without making storage assumptions. The repository only
//! ever talks to this trait, so tests inject the in-memory implementation.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{Document, DocumentStore, StoreError};
