use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use stockroom_core::{DocumentId, SortDirection};

use super::r#trait::{Document, DocumentStore, StoreError};

/// In-memory document store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<DocumentId, JsonValue>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Store-style total order over field values: null < bool < number < string.
/// Anything else (arrays, objects) sorts last by its JSON rendering.
fn compare_field_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    fn rank(v: &JsonValue) -> u8 {
        match v {
            JsonValue::Null => 0,
            JsonValue::Bool(_) => 1,
            JsonValue::Number(_) => 2,
            JsonValue::String(_) => 3,
            _ => 4,
        }
    }

    match (a, b) {
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn merge_patch(body: &mut JsonValue, patch: JsonValue) -> Result<(), StoreError> {
    let JsonValue::Object(fields) = patch else {
        return Err(StoreError::Serialization(
            "update patch must be a JSON object".to_string(),
        ));
    };

    if !body.is_object() {
        *body = JsonValue::Object(serde_json::Map::new());
    }
    let target = body
        .as_object_mut()
        .ok_or_else(|| StoreError::Backend("stored body is not an object".to_string()))?;

    for (key, value) in fields {
        target.insert(key, value);
    }
    Ok(())
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let id = DocumentId::new();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, body);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(&id))
            .map(|body| Document {
                id,
                body: body.clone(),
            }))
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let mut matches: Vec<Document> = collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|(_, body)| body.get(field) == Some(value))
            .map(|(id, body)| Document {
                id: *id,
                body: body.clone(),
            })
            .collect();

        // Deterministic result order for callers that take the first match.
        matches.sort_by_key(|d| *d.id.as_uuid());
        Ok(matches)
    }

    async fn update(
        &self,
        collection: &str,
        id: DocumentId,
        patch: JsonValue,
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let body = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(&id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        merge_patch(body, patch)
    }

    async fn delete(&self, collection: &str, id: DocumentId) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        if let Some(documents) = collections.get_mut(collection) {
            documents.remove(&id);
        }
        Ok(())
    }

    async fn list_ordered_by(
        &self,
        collection: &str,
        field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let mut documents: Vec<Document> = collections
            .get(collection)
            .into_iter()
            .flatten()
            .map(|(id, body)| Document {
                id: *id,
                body: body.clone(),
            })
            .collect();

        documents.sort_by(|a, b| {
            let ordering = match (a.body.get(field), b.body.get(field)) {
                (Some(x), Some(y)) => compare_field_values(x, y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_get_round_trip() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create("widgets", json!({"name": "bolt", "qty": 3}))
            .await
            .unwrap();

        let doc = store.get("widgets", id).await.unwrap().unwrap();
        assert_eq!(doc.body["name"], "bolt");

        let missing = store.get("widgets", DocumentId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_merges_shallowly_and_fails_on_missing_id() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create("widgets", json!({"name": "bolt", "qty": 3}))
            .await
            .unwrap();

        store
            .update("widgets", id, json!({"qty": 9, "grade": "A"}))
            .await
            .unwrap();

        let doc = store.get("widgets", id).await.unwrap().unwrap();
        assert_eq!(doc.body, json!({"name": "bolt", "qty": 9, "grade": "A"}));

        let err = store
            .update("widgets", DocumentId::new(), json!({"qty": 1}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_rejects_non_object_patch() {
        let store = InMemoryDocumentStore::new();
        let id = store.create("widgets", json!({})).await.unwrap();

        let err = store.update("widgets", id, json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn delete_is_a_no_op_for_missing_ids() {
        let store = InMemoryDocumentStore::new();
        let id = store.create("widgets", json!({"qty": 1})).await.unwrap();

        store.delete("widgets", id).await.unwrap();
        store.delete("widgets", id).await.unwrap();
        assert!(store.get("widgets", id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_by_field_matches_exact_values() {
        let store = InMemoryDocumentStore::new();
        store
            .create("widgets", json!({"sku": "A", "qty": 1}))
            .await
            .unwrap();
        store
            .create("widgets", json!({"sku": "B", "qty": 2}))
            .await
            .unwrap();

        let hits = store
            .query_by_field("widgets", "sku", &json!("B"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].body["qty"], 2);

        let none = store
            .query_by_field("widgets", "sku", &json!("C"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn list_orders_by_field_in_both_directions() {
        let store = InMemoryDocumentStore::new();
        for stamp in ["2024-01-02T00:00:00.000000000Z", "2024-01-03T00:00:00.000000000Z", "2024-01-01T00:00:00.000000000Z"] {
            store
                .create("widgets", json!({"lastUpdated": stamp}))
                .await
                .unwrap();
        }

        let ascending = store
            .list_ordered_by("widgets", "lastUpdated", SortDirection::Ascending)
            .await
            .unwrap();
        let stamps: Vec<&str> = ascending
            .iter()
            .map(|d| d.body["lastUpdated"].as_str().unwrap())
            .collect();
        assert_eq!(
            stamps,
            vec![
                "2024-01-01T00:00:00.000000000Z",
                "2024-01-02T00:00:00.000000000Z",
                "2024-01-03T00:00:00.000000000Z"
            ]
        );

        let descending = store
            .list_ordered_by("widgets", "lastUpdated", SortDirection::Descending)
            .await
            .unwrap();
        assert_eq!(
            descending.first().unwrap().body["lastUpdated"],
            "2024-01-03T00:00:00.000000000Z"
        );
    }

    #[tokio::test]
    async fn missing_sort_field_leads_ascending_and_trails_descending() {
        let store = InMemoryDocumentStore::new();
        store
            .create("widgets", json!({"lastUpdated": "2024-01-01T00:00:00.000000000Z"}))
            .await
            .unwrap();
        let bare = store.create("widgets", json!({})).await.unwrap();

        let ascending = store
            .list_ordered_by("widgets", "lastUpdated", SortDirection::Ascending)
            .await
            .unwrap();
        assert_eq!(ascending.first().unwrap().id, bare);

        let descending = store
            .list_ordered_by("widgets", "lastUpdated", SortDirection::Descending)
            .await
            .unwrap();
        assert_eq!(descending.last().unwrap().id, bare);
    }

    #[test]
    fn field_value_order_ranks_types_store_style() {
        use serde_json::Value;
        let null = Value::Null;
        let boolean = json!(true);
        let number = json!(5);
        let string = json!("5");

        assert_eq!(compare_field_values(&null, &boolean), Ordering::Less);
        assert_eq!(compare_field_values(&boolean, &number), Ordering::Less);
        assert_eq!(compare_field_values(&number, &string), Ordering::Less);
        assert_eq!(compare_field_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_field_values(&json!("10"), &json!("2")), Ordering::Less);
    }
}
