//! Override Store Adapter: loads and persists human-approved exceptions,
//! currently the "this duplicate name pair is acceptable" acknowledgment
//! keyed by normalized name.
//!
//! Load is best-effort: if the backend read fails the adapter logs a
//! warning and starts from an empty map, so every duplicate-name issue
//! simply surfaces unacknowledged. Upsert is idempotent under the
//! composite (kind, key): a repeated call updates the existing row in
//! place instead of inserting a twin.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::DataQualityResult;
use crate::store::StoreClient;
use crate::types::{EntityKind, OverrideKind, OverrideRecord};

/// Rule-specific key -> override record, for one [`OverrideKind`]
pub type OverrideMap = HashMap<String, OverrideRecord>;

/// Adapter between the engine and the persisted override collection
pub struct OverrideStore {
    store: Arc<dyn StoreClient>,
    map: OverrideMap,
}

impl OverrideStore {
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self {
            store,
            map: OverrideMap::new(),
        }
    }

    /// Current in-memory override map (what the checkers consume)
    pub fn map(&self) -> &OverrideMap {
        &self.map
    }

    /// Reload all overrides of `kind` from the store. A failed read or an
    /// undecodable row degrades to "no overrides yet" rather than erroring.
    pub async fn load(&mut self, kind: OverrideKind) {
        self.map.clear();
        let rows = match self.store.fetch_all(EntityKind::Overrides).await {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!(
                    "Override load failed ({}); duplicate issues will surface unacknowledged",
                    e
                );
                return;
            }
        };

        for row in rows {
            match serde_json::from_value::<OverrideRecord>(row) {
                Ok(record) if record.kind == kind => {
                    self.map.insert(record.key.clone(), record);
                }
                Ok(_) => {} // other kinds, none defined yet
                Err(e) => {
                    log::warn!("Skipping undecodable override row: {}", e);
                }
            }
        }
        log::debug!("Loaded {} override(s) for {:?}", self.map.len(), kind);
    }

    /// Look the (kind, key) row up in the backend, bypassing the cache.
    /// Used before an insert so a degraded or stale load cannot spawn a
    /// twin row. Read failures fall back to "not found".
    async fn backend_record(&self, kind: OverrideKind, key: &str) -> Option<OverrideRecord> {
        let rows = self.store.fetch_all(EntityKind::Overrides).await.ok()?;
        rows.into_iter()
            .filter_map(|row| serde_json::from_value::<OverrideRecord>(row).ok())
            .find(|r| r.kind == kind && r.key == key)
    }

    /// Create or update the override for (kind, key). Repeated calls with
    /// the same key update the same row; the cached map is refreshed only
    /// after the backend write succeeds.
    pub async fn upsert(
        &mut self,
        kind: OverrideKind,
        key: &str,
        seed_ids: Vec<i64>,
        acknowledged: bool,
    ) -> DataQualityResult<OverrideRecord> {
        let mut existing = self.map.get(key).cloned();
        if existing.as_ref().and_then(|r| r.id).is_none() {
            // The cache has no row id for this key (empty or degraded
            // load); re-check the backend before inserting
            existing = self.backend_record(kind, key).await;
        }

        let record = match existing.as_ref().and_then(|r| r.id) {
            Some(id) => {
                let patch = serde_json::json!({
                    "seed_ids": seed_ids,
                    "acknowledged": acknowledged,
                });
                self.store.update(EntityKind::Overrides, id, patch).await?;
                OverrideRecord {
                    id: Some(id),
                    kind,
                    key: key.to_string(),
                    seed_ids,
                    acknowledged,
                    note: existing.and_then(|r| r.note),
                }
            }
            None => {
                let record = OverrideRecord {
                    id: None,
                    kind,
                    key: key.to_string(),
                    seed_ids,
                    acknowledged,
                    note: None,
                };
                let row = serde_json::to_value(&record)
                    .unwrap_or(Value::Null);
                let stored = self.store.insert(EntityKind::Overrides, row).await?;
                serde_json::from_value(stored).unwrap_or(record)
            }
        };

        self.map.insert(key.to_string(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn adapter_with(store: Arc<InMemoryStore>) -> OverrideStore {
        OverrideStore::new(store)
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty_map() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_fetch(EntityKind::Overrides).await;
        let mut overrides = adapter_with(store);
        overrides.load(OverrideKind::DuplicateName).await;
        assert!(overrides.map().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_then_load_round_trips() {
        let store = Arc::new(InMemoryStore::new());
        let mut overrides = adapter_with(store.clone());
        overrides.load(OverrideKind::DuplicateName).await;

        overrides
            .upsert(OverrideKind::DuplicateName, "sunflower", vec![1, 2], true)
            .await
            .unwrap();

        let mut fresh = adapter_with(store);
        fresh.load(OverrideKind::DuplicateName).await;
        let record = fresh.map().get("sunflower").expect("persisted");
        assert!(record.acknowledged);
        assert_eq!(record.seed_ids, vec![1, 2]);
        assert!(record.id.is_some());
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_under_key() {
        let store = Arc::new(InMemoryStore::new());
        let mut overrides = adapter_with(store.clone());

        let first = overrides
            .upsert(OverrideKind::DuplicateName, "zinnia", vec![3, 4], true)
            .await
            .unwrap();
        let second = overrides
            .upsert(OverrideKind::DuplicateName, "zinnia", vec![3, 4], false)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(!second.acknowledged);

        // One row in the backing store, not two
        let rows = store.fetch_all(EntityKind::Overrides).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["acknowledged"], false);
    }

    #[tokio::test]
    async fn test_upsert_without_loaded_cache_updates_existing_row() {
        let store = Arc::new(InMemoryStore::new());
        let mut first = adapter_with(store.clone());
        first
            .upsert(OverrideKind::DuplicateName, "marigold", vec![5, 6], true)
            .await
            .unwrap();

        // A second adapter that never loaded (or loaded while the read was
        // failing) must find the persisted row instead of inserting a twin
        let mut fresh = adapter_with(store.clone());
        let record = fresh
            .upsert(OverrideKind::DuplicateName, "marigold", vec![5, 6], false)
            .await
            .unwrap();
        assert!(!record.acknowledged);

        let rows = store.fetch_all(EntityKind::Overrides).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["acknowledged"], false);
    }

    #[tokio::test]
    async fn test_failed_upsert_leaves_cache_untouched() {
        let store = Arc::new(InMemoryStore::new());
        let mut overrides = adapter_with(store.clone());
        overrides
            .upsert(OverrideKind::DuplicateName, "cosmos", vec![7], true)
            .await
            .unwrap();

        store.fail_writes(true);
        let result = overrides
            .upsert(OverrideKind::DuplicateName, "cosmos", vec![7], false)
            .await;
        assert!(result.is_err());
        assert!(overrides.map()["cosmos"].acknowledged);
    }
}
