//! Inventory domain module.
//!
//! This crate contains the inventory item entity and the analytics derived
//! from an item list, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod analytics;
pub mod item;

pub use analytics::{
    AnalyticsPolicy, CategoryQuantity, InventoryAnalysis, analyze, category_distribution,
    low_stock, total_value,
};
pub use item::{InventoryItem, ItemDraft, ItemId, ItemPatch, ItemRecord};
