//! Derived views over a retrieved item list.
//!
//! All three views are pure functions; [`analyze`] computes them together
//! from one list so callers can serve a dashboard from a single fetch.

use serde::{Deserialize, Serialize};

use stockroom_core::SortDirection;

use crate::item::InventoryItem;

/// Stock level below which an item counts as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = 10;

/// Analytics configuration.
///
/// The threshold and default sort direction are deliberate configuration,
/// not buried constants, so tests and deployments can vary them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPolicy {
    pub low_stock_threshold: u64,
    pub default_sort: SortDirection,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            default_sort: SortDirection::Descending,
        }
    }
}

/// Total stocked quantity for one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuantity {
    pub category: String,
    pub quantity: u64,
}

/// The three derived views, computed together from one item list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryAnalysis {
    pub low_stock: Vec<InventoryItem>,
    pub total_value: f64,
    pub category_distribution: Vec<CategoryQuantity>,
}

/// Items whose quantity is strictly below `threshold`.
pub fn low_stock(items: &[InventoryItem], threshold: u64) -> Vec<InventoryItem> {
    items
        .iter()
        .filter(|item| item.quantity < threshold)
        .cloned()
        .collect()
}

/// Sum of `price * quantity` over all items (plain floating-point summation;
/// rounding is a display concern).
pub fn total_value(items: &[InventoryItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price * item.quantity as f64)
        .sum()
}

/// Quantity totals grouped by category, in first-seen category order.
pub fn category_distribution(items: &[InventoryItem]) -> Vec<CategoryQuantity> {
    let mut groups: Vec<CategoryQuantity> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => group.quantity += item.quantity,
            None => groups.push(CategoryQuantity {
                category: item.category.clone(),
                quantity: item.quantity,
            }),
        }
    }
    groups
}

/// Compute all three derived views from one retrieved list.
pub fn analyze(items: &[InventoryItem], policy: &AnalyticsPolicy) -> InventoryAnalysis {
    InventoryAnalysis {
        low_stock: low_stock(items, policy.low_stock_threshold),
        total_value: total_value(items),
        category_distribution: category_distribution(items),
    }
}
