//! Service wiring: which document store backs the repository, plus the
//! analytics policy the handlers consult.

use stockroom_core::SortDirection;
use stockroom_infra::{
    InMemoryDocumentStore, InventoryRepository, PostgresDocumentStore, StoreError, UpsertOutcome,
};
use stockroom_inventory::{AnalyticsPolicy, InventoryItem, ItemDraft, ItemId, ItemPatch};

/// Application services handed to every handler via request extensions.
///
/// The repository's store handle is fixed at startup; there is no global
/// client instance anywhere.
pub struct AppServices {
    policy: AnalyticsPolicy,
    backend: Backend,
}

enum Backend {
    InMemory(InventoryRepository<InMemoryDocumentStore>),
    Persistent(InventoryRepository<PostgresDocumentStore>),
}

impl AppServices {
    /// In-memory backed services (dev/test).
    pub fn in_memory() -> Self {
        Self::in_memory_with_policy(AnalyticsPolicy::default())
    }

    pub fn in_memory_with_policy(policy: AnalyticsPolicy) -> Self {
        Self {
            policy,
            backend: Backend::InMemory(InventoryRepository::new(InMemoryDocumentStore::new())),
        }
    }

    pub fn persistent(store: PostgresDocumentStore, policy: AnalyticsPolicy) -> Self {
        Self {
            policy,
            backend: Backend::Persistent(InventoryRepository::new(store)),
        }
    }

    pub fn policy(&self) -> &AnalyticsPolicy {
        &self.policy
    }

    pub async fn upsert_item(&self, draft: &ItemDraft) -> Result<UpsertOutcome, StoreError> {
        match &self.backend {
            Backend::InMemory(repository) => repository.upsert_by_part_number(draft).await,
            Backend::Persistent(repository) => repository.upsert_by_part_number(draft).await,
        }
    }

    pub async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<(), StoreError> {
        match &self.backend {
            Backend::InMemory(repository) => repository.update_item(id, patch).await,
            Backend::Persistent(repository) => repository.update_item(id, patch).await,
        }
    }

    pub async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        match &self.backend {
            Backend::InMemory(repository) => repository.delete_item(id).await,
            Backend::Persistent(repository) => repository.delete_item(id).await,
        }
    }

    pub async fn list_items(
        &self,
        direction: SortDirection,
    ) -> Result<Vec<InventoryItem>, StoreError> {
        match &self.backend {
            Backend::InMemory(repository) => repository.list_sorted(direction).await,
            Backend::Persistent(repository) => repository.list_sorted(direction).await,
        }
    }
}

/// Build services from the environment.
///
/// `USE_PERSISTENT_STORES=true` plus `DATABASE_URL` selects Postgres;
/// anything else (including a failed connection) warns and falls back to
/// the in-memory store. `LOW_STOCK_THRESHOLD` overrides the default policy.
pub async fn build_services() -> AppServices {
    let policy = policy_from_env();

    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        match std::env::var("DATABASE_URL") {
            Ok(url) => match PostgresDocumentStore::connect(&url).await {
                Ok(store) => return AppServices::persistent(store, policy),
                Err(e) => tracing::warn!(
                    error = %e,
                    "failed to connect persistent store, falling back to in-memory"
                ),
            },
            Err(_) => tracing::warn!(
                "USE_PERSISTENT_STORES=true but DATABASE_URL not set, falling back to in-memory"
            ),
        }
    }

    AppServices::in_memory_with_policy(policy)
}

fn policy_from_env() -> AnalyticsPolicy {
    let mut policy = AnalyticsPolicy::default();
    if let Ok(raw) = std::env::var("LOW_STOCK_THRESHOLD") {
        match raw.parse::<u64>() {
            Ok(threshold) => policy.low_stock_threshold = threshold,
            Err(_) => tracing::warn!(%raw, "ignoring unparseable LOW_STOCK_THRESHOLD"),
        }
    }
    policy
}
