//! Request/response DTOs, list filtering, and display formatting.

use serde::{Deserialize, Serialize};

use stockroom_core::SortDirection;
use stockroom_inventory::{CategoryQuantity, InventoryItem};

// -------------------------
// Request DTOs
// -------------------------

/// Query string for item listings. `direction` defaults to the configured
/// policy's sort; `search` and `category` mirror the management table's
/// filter controls.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub direction: Option<SortDirection>,
    pub search: Option<String>,
    pub category: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub id: String,
    pub merged: bool,
}

/// Everything the dashboard page needs, derived from one fetch.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub items: Vec<InventoryItem>,
    pub low_stock_items: Vec<InventoryItem>,
    pub total_value: f64,
    pub total_value_display: String,
    pub category_distribution: Vec<CategoryQuantity>,
}

/// Apply the management table's filters: case-insensitive substring search
/// over name/description/part number, and exact category match.
pub fn apply_filters(items: Vec<InventoryItem>, query: &ListQuery) -> Vec<InventoryItem> {
    let needle = query
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());

    items
        .into_iter()
        .filter(|item| match &query.category {
            Some(category) => &item.category == category,
            None => true,
        })
        .filter(|item| match &needle {
            Some(needle) => {
                item.name.to_lowercase().contains(needle)
                    || item.description.to_lowercase().contains(needle)
                    || item.part_number.to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect()
}

/// Format an amount as Indian-grouped currency, e.g. `₹12,34,567.89`.
///
/// Grouping is 3 digits, then 2s (lakh/crore), matching `en-IN` formatting.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let paise = (amount.abs() * 100.0).round() as u128;
    let rupees = (paise / 100).to_string();
    format!("{sign}\u{20B9}{}.{:02}", group_indian(&rupees), paise % 100)
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockroom_core::DocumentId;
    use stockroom_inventory::{ItemId, ItemRecord};

    fn test_item(part_number: &str, name: &str, category: &str) -> InventoryItem {
        InventoryItem::from_record(
            ItemId::new(DocumentId::new()),
            ItemRecord {
                part_number: part_number.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                description: format!("{name} description"),
                quantity: 1,
                price: 1.0,
                last_updated: Utc::now(),
            },
        )
    }

    #[test]
    fn formats_indian_currency_grouping() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(999.0), "₹999.00");
        assert_eq!(format_inr(1000.0), "₹1,000.00");
        assert_eq!(format_inr(100000.0), "₹1,00,000.00");
        assert_eq!(format_inr(1234567.89), "₹12,34,567.89");
        assert_eq!(format_inr(250.5), "₹250.50");
    }

    #[test]
    fn search_matches_name_description_and_part_number() {
        let items = vec![
            test_item("PN-100", "Hex bolt", "Fasteners"),
            test_item("PN-200", "Washer", "Fasteners"),
        ];

        let query = ListQuery {
            search: Some("HEX".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(apply_filters(items.clone(), &query).len(), 1);

        let query = ListQuery {
            search: Some("pn-200".to_string()),
            ..ListQuery::default()
        };
        let hits = apply_filters(items.clone(), &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Washer");

        // A blank search string filters nothing.
        let query = ListQuery {
            search: Some("".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(apply_filters(items, &query).len(), 2);
    }

    #[test]
    fn category_filter_is_exact() {
        let items = vec![
            test_item("PN-100", "Hex bolt", "Fasteners"),
            test_item("PN-300", "Bearing", "Mechanical"),
        ];

        let query = ListQuery {
            category: Some("Mechanical".to_string()),
            ..ListQuery::default()
        };
        let hits = apply_filters(items.clone(), &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].part_number, "PN-300");

        let query = ListQuery {
            category: Some("mechanical".to_string()),
            ..ListQuery::default()
        };
        assert!(apply_filters(items, &query).is_empty());
    }
}
