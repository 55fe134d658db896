//! `stockroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod sort;

pub use error::{DomainError, DomainResult};
pub use id::DocumentId;
pub use sort::SortDirection;
