use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DocumentId, DomainError, DomainResult};

/// Inventory item identifier (wraps the persistence-layer document id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub DocumentId);

impl ItemId {
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Render a timestamp the way stored documents carry it: RFC 3339, UTC,
/// fixed nanosecond width so lexicographic order equals chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Serde adapter for the stored `lastUpdated` representation.
pub mod timestamp {
    use super::*;
    use serde::{Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(*at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

/// The fields a caller submits when adding stock (no `id`, no `lastUpdated`;
/// both are owned by the persistence path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub part_number: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub quantity: u64,
    pub price: f64,
}

impl ItemDraft {
    /// Field-level form rules: required text fields and a positive price.
    ///
    /// These are boundary checks, not storage guarantees; the repository
    /// persists whatever it is handed.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("partNumber", &self.part_number)?;
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        require_text("description", &self.description)?;
        require_price(self.price)
    }
}

/// Partial update payload: `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.part_number.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }

    /// Same form rules as [`ItemDraft::validate`], applied to present fields only.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(part_number) = &self.part_number {
            require_text("partNumber", part_number)?;
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(category) = &self.category {
            require_text("category", category)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(price) = self.price {
            require_price(price)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 1.0 {
        return Err(DomainError::validation("price must be more than 0"));
    }
    Ok(())
}

/// The stored document body (everything but the id, which keys the document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub part_number: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub quantity: u64,
    pub price: f64,
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl ItemRecord {
    pub fn from_draft(draft: ItemDraft, at: DateTime<Utc>) -> Self {
        Self {
            part_number: draft.part_number,
            name: draft.name,
            category: draft.category,
            description: draft.description,
            quantity: draft.quantity,
            price: draft.price,
            last_updated: at,
        }
    }
}

/// A persisted inventory item: stored record plus its assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub part_number: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub quantity: u64,
    pub price: f64,
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    pub fn from_record(id: ItemId, record: ItemRecord) -> Self {
        Self {
            id,
            part_number: record.part_number,
            name: record.name,
            category: record.category,
            description: record.description,
            quantity: record.quantity,
            price: record.price,
            last_updated: record.last_updated,
        }
    }
}
