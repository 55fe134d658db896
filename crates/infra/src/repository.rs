//! Inventory repository: upsert-by-part-number and sorted retrieval layered
//! on the document store.
//!
//! The repository owns `lastUpdated`: every mutating operation refreshes it,
//! and callers never set it directly. There are no retries and no partial
//! failure handling; each call either fully succeeds or fully fails, and
//! store failures propagate to the caller after being logged.

use chrono::Utc;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, instrument};

use stockroom_core::SortDirection;
use stockroom_inventory::{InventoryItem, ItemDraft, ItemId, ItemPatch, ItemRecord, item};

use crate::document_store::{DocumentStore, StoreError};

/// Collection name under which inventory items are stored.
pub const INVENTORY_COLLECTION: &str = "inventory";

/// Result of an upsert: the affected record's id, and whether the draft was
/// merged into an existing record rather than creating a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: ItemId,
    pub merged: bool,
}

/// Inventory persistence operations over an injected store handle.
#[derive(Debug, Clone)]
pub struct InventoryRepository<D> {
    store: D,
}

impl<D: DocumentStore> InventoryRepository<D> {
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Insert-or-merge keyed by part number.
    ///
    /// If a record with the draft's part number exists, its quantity becomes
    /// `existing + draft` (saturating at `u64::MAX`) and `lastUpdated` is
    /// refreshed; name, category,
    /// description and price are deliberately left as stored (the edit path
    /// is the sanctioned way to change them). Otherwise a new record is
    /// created. Exactly one store write happens either way.
    #[instrument(skip(self, draft), fields(part_number = %draft.part_number), err)]
    pub async fn upsert_by_part_number(
        &self,
        draft: &ItemDraft,
    ) -> Result<UpsertOutcome, StoreError> {
        let matches = self
            .store
            .query_by_field(
                INVENTORY_COLLECTION,
                "partNumber",
                &JsonValue::String(draft.part_number.clone()),
            )
            .await?;

        if let Some(existing) = matches.into_iter().next() {
            let record: ItemRecord = serde_json::from_value(existing.body)?;
            let patch = json!({
                "quantity": record.quantity.saturating_add(draft.quantity),
                "lastUpdated": item::format_timestamp(Utc::now()),
            });

            self.store
                .update(INVENTORY_COLLECTION, existing.id, patch)
                .await?;

            debug!(id = %existing.id, "merged quantities into existing item");
            return Ok(UpsertOutcome {
                id: ItemId::new(existing.id),
                merged: true,
            });
        }

        let record = ItemRecord::from_draft(draft.clone(), Utc::now());
        let id = self
            .store
            .create(INVENTORY_COLLECTION, serde_json::to_value(&record)?)
            .await?;

        debug!(%id, "created new item");
        Ok(UpsertOutcome {
            id: ItemId::new(id),
            merged: false,
        })
    }

    /// Apply a partial update and refresh `lastUpdated`.
    ///
    /// Propagates the store's not-found condition when the id is unknown.
    #[instrument(skip(self, patch), err)]
    pub async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<(), StoreError> {
        let mut body = serde_json::to_value(patch)?;
        let fields = body
            .as_object_mut()
            .ok_or_else(|| StoreError::Serialization("patch must serialize to an object".to_string()))?;
        fields.insert(
            "lastUpdated".to_string(),
            JsonValue::String(item::format_timestamp(Utc::now())),
        );

        self.store.update(INVENTORY_COLLECTION, id.0, body).await
    }

    /// Remove a record by id.
    ///
    /// Whether deleting a missing id no-ops or errors is the store's native
    /// behavior; callers must not assume either.
    #[instrument(skip(self), err)]
    pub async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        self.store.delete(INVENTORY_COLLECTION, id.0).await
    }

    /// All items ordered by `lastUpdated`. No pagination; intended for
    /// datasets small enough to render in one page load.
    pub async fn list_sorted(
        &self,
        direction: SortDirection,
    ) -> Result<Vec<InventoryItem>, StoreError> {
        let documents = self
            .store
            .list_ordered_by(INVENTORY_COLLECTION, "lastUpdated", direction)
            .await?;

        documents
            .into_iter()
            .map(|doc| {
                let record: ItemRecord = serde_json::from_value(doc.body)?;
                Ok(InventoryItem::from_record(ItemId::new(doc.id), record))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::InMemoryDocumentStore;

    fn test_draft(part_number: &str, quantity: u64) -> ItemDraft {
        ItemDraft {
            part_number: part_number.to_string(),
            name: "Hex bolt M8".to_string(),
            category: "Fasteners".to_string(),
            description: "Zinc plated, 40mm".to_string(),
            quantity,
            price: 3.5,
        }
    }

    fn test_repository() -> InventoryRepository<InMemoryDocumentStore> {
        InventoryRepository::new(InMemoryDocumentStore::new())
    }

    #[tokio::test]
    async fn upsert_new_part_number_creates_one_record() {
        let repo = test_repository();

        let outcome = repo
            .upsert_by_part_number(&test_draft("PN-1", 5))
            .await
            .unwrap();
        assert!(!outcome.merged);

        let items = repo.list_sorted(SortDirection::Descending).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, outcome.id);
        assert_eq!(items[0].quantity, 5);
    }

    #[tokio::test]
    async fn upsert_existing_part_number_merges_quantity_only() {
        let repo = test_repository();

        let first = repo
            .upsert_by_part_number(&test_draft("PN-1", 5))
            .await
            .unwrap();

        // Second draft carries different descriptive fields and price.
        let mut second_draft = test_draft("PN-1", 3);
        second_draft.name = "Different name".to_string();
        second_draft.category = "Different category".to_string();
        second_draft.description = "Different description".to_string();
        second_draft.price = 99.0;

        let second = repo.upsert_by_part_number(&second_draft).await.unwrap();
        assert!(second.merged);
        assert_eq!(second.id, first.id);

        let items = repo.list_sorted(SortDirection::Descending).await.unwrap();
        assert_eq!(items.len(), 1, "merge must not create a second record");

        let item = &items[0];
        assert_eq!(item.quantity, 8);
        // The merge only touches quantity and lastUpdated.
        assert_eq!(item.name, "Hex bolt M8");
        assert_eq!(item.category, "Fasteners");
        assert_eq!(item.description, "Zinc plated, 40mm");
        assert_eq!(item.price, 3.5);
    }

    #[tokio::test]
    async fn upsert_merge_saturates_quantity_at_max() {
        let repo = test_repository();

        repo.upsert_by_part_number(&test_draft("PN-1", u64::MAX))
            .await
            .unwrap();
        let outcome = repo
            .upsert_by_part_number(&test_draft("PN-1", 1))
            .await
            .unwrap();
        assert!(outcome.merged);

        let items = repo.list_sorted(SortDirection::Descending).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, u64::MAX);
    }

    #[tokio::test]
    async fn mutations_strictly_advance_last_updated() {
        let repo = test_repository();

        let outcome = repo
            .upsert_by_part_number(&test_draft("PN-1", 5))
            .await
            .unwrap();
        let created_at = repo.list_sorted(SortDirection::Descending).await.unwrap()[0].last_updated;

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        repo.upsert_by_part_number(&test_draft("PN-1", 1))
            .await
            .unwrap();
        let merged_at = repo.list_sorted(SortDirection::Descending).await.unwrap()[0].last_updated;
        assert!(merged_at > created_at);

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let patch = ItemPatch {
            quantity: Some(40),
            ..ItemPatch::default()
        };
        repo.update_item(outcome.id, &patch).await.unwrap();
        let updated_at = repo.list_sorted(SortDirection::Descending).await.unwrap()[0].last_updated;
        assert!(updated_at > merged_at);
    }

    #[tokio::test]
    async fn update_applies_patch_fields_and_fails_on_unknown_id() {
        let repo = test_repository();

        let outcome = repo
            .upsert_by_part_number(&test_draft("PN-1", 5))
            .await
            .unwrap();

        let patch = ItemPatch {
            name: Some("Renamed".to_string()),
            price: Some(12.0),
            ..ItemPatch::default()
        };
        repo.update_item(outcome.id, &patch).await.unwrap();

        let item = &repo.list_sorted(SortDirection::Descending).await.unwrap()[0];
        assert_eq!(item.name, "Renamed");
        assert_eq!(item.price, 12.0);
        assert_eq!(item.quantity, 5, "absent patch fields stay untouched");

        let unknown = ItemId::new(stockroom_core::DocumentId::new());
        let err = repo.update_item(unknown, &patch).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn deleted_ids_never_reappear_in_listings() {
        let repo = test_repository();

        let kept = repo
            .upsert_by_part_number(&test_draft("PN-1", 5))
            .await
            .unwrap();
        let dropped = repo
            .upsert_by_part_number(&test_draft("PN-2", 7))
            .await
            .unwrap();

        repo.delete_item(dropped.id).await.unwrap();

        let items = repo.list_sorted(SortDirection::Descending).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, kept.id);
        assert!(items.iter().all(|i| i.id != dropped.id));
    }

    #[tokio::test]
    async fn list_orders_by_last_updated_in_both_directions() {
        let repo = test_repository();

        for part in ["PN-1", "PN-2", "PN-3"] {
            repo.upsert_by_part_number(&test_draft(part, 1))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let descending = repo.list_sorted(SortDirection::Descending).await.unwrap();
        let parts: Vec<&str> = descending.iter().map(|i| i.part_number.as_str()).collect();
        assert_eq!(parts, vec!["PN-3", "PN-2", "PN-1"]);

        let ascending = repo.list_sorted(SortDirection::Ascending).await.unwrap();
        let parts: Vec<&str> = ascending.iter().map(|i| i.part_number.as_str()).collect();
        assert_eq!(parts, vec!["PN-1", "PN-2", "PN-3"]);
    }
}
