//! `DataQualityEngine`: the entry point the admin dashboard talks to.
//!
//! The engine owns in-memory snapshots of the four entity collections plus
//! the override map, all fetched through an injected [`StoreClient`]
//! (never an ambient singleton, so tests run against the in-memory store).
//! Issue computation is a pure re-derivation over the snapshots; callers
//! re-run [`DataQualityEngine::issues`] after any successful write and
//! resolved defects drop out on their own.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::aggregator::{compute_issues, GroupedIssues};
use crate::errors::{DataQualityError, DataQualityResult};
use crate::normalize::normalize_name;
use crate::overrides::{OverrideMap, OverrideStore};
use crate::remediation::RemediationDispatcher;
use crate::store::{StoreClient, StoreResult, TaskTracker};
use crate::types::{
    EntityKind, InventoryLot, OverrideKind, OverrideRecord, PricingRecord, Seed, SeedImage,
};

pub struct DataQualityEngine {
    store: Arc<dyn StoreClient>,
    dispatcher: RemediationDispatcher,
    overrides: OverrideStore,
    seeds: Option<Vec<Seed>>,
    images: Option<Vec<SeedImage>>,
    inventory: Option<Vec<InventoryLot>>,
    pricing: Option<Vec<PricingRecord>>,
}

fn decode_rows<T: DeserializeOwned>(
    kind: EntityKind,
    rows: Vec<Value>,
) -> DataQualityResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| DataQualityError::Decode {
                entity: kind.as_str().to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn fetch_err(kind: EntityKind, result: &StoreResult<Vec<Value>>) -> Option<DataQualityError> {
    result.as_ref().err().map(|e| DataQualityError::Fetch {
        entity: kind.as_str().to_string(),
        message: e.to_string(),
    })
}

impl DataQualityEngine {
    pub fn new(store: Arc<dyn StoreClient>, tasks: Arc<dyn TaskTracker>) -> Self {
        Self {
            dispatcher: RemediationDispatcher::new(store.clone(), tasks),
            overrides: OverrideStore::new(store.clone()),
            store,
            seeds: None,
            images: None,
            inventory: None,
            pricing: None,
        }
    }

    /// Bulk-load all four entity collections, then the override map.
    ///
    /// All-or-nothing: if any of the four reads fails, or any collection
    /// fails to decode, the snapshots are cleared and a single aggregate
    /// error is returned, so the dashboard renders no issues rather than
    /// a partial, inconsistent list. The override load is best-effort and
    /// never fails the call.
    pub async fn load_all(&mut self) -> DataQualityResult<()> {
        let (seeds, images, inventory, pricing) = tokio::join!(
            self.store.fetch_all(EntityKind::Seeds),
            self.store.fetch_all(EntityKind::SeedImages),
            self.store.fetch_all(EntityKind::Inventory),
            self.store.fetch_all(EntityKind::Pricing),
        );

        let first_failure = fetch_err(EntityKind::Seeds, &seeds)
            .or_else(|| fetch_err(EntityKind::SeedImages, &images))
            .or_else(|| fetch_err(EntityKind::Inventory, &inventory))
            .or_else(|| fetch_err(EntityKind::Pricing, &pricing));
        if let Some(err) = first_failure {
            self.clear_snapshots();
            log::error!("Data quality load failed: {}", err);
            return Err(err);
        }

        // Decode every collection before touching the snapshots, so a bad
        // row in one collection cannot leave them mixed across generations
        match Self::decode_all(
            seeds.unwrap_or_default(),
            images.unwrap_or_default(),
            inventory.unwrap_or_default(),
            pricing.unwrap_or_default(),
        ) {
            Ok((seeds, images, inventory, pricing)) => {
                self.seeds = Some(seeds);
                self.images = Some(images);
                self.inventory = Some(inventory);
                self.pricing = Some(pricing);
            }
            Err(err) => {
                self.clear_snapshots();
                log::error!("Data quality load failed: {}", err);
                return Err(err);
            }
        }

        self.overrides.load(OverrideKind::DuplicateName).await;

        log::info!(
            "Loaded {} seed(s), {} image(s), {} lot(s), {} pricing row(s)",
            self.seeds.as_ref().map(Vec::len).unwrap_or(0),
            self.images.as_ref().map(Vec::len).unwrap_or(0),
            self.inventory.as_ref().map(Vec::len).unwrap_or(0),
            self.pricing.as_ref().map(Vec::len).unwrap_or(0),
        );
        Ok(())
    }

    fn clear_snapshots(&mut self) {
        self.seeds = None;
        self.images = None;
        self.inventory = None;
        self.pricing = None;
    }

    #[allow(clippy::type_complexity)]
    fn decode_all(
        seeds: Vec<Value>,
        images: Vec<Value>,
        inventory: Vec<Value>,
        pricing: Vec<Value>,
    ) -> DataQualityResult<(Vec<Seed>, Vec<SeedImage>, Vec<InventoryLot>, Vec<PricingRecord>)> {
        Ok((
            decode_rows(EntityKind::Seeds, seeds)?,
            decode_rows(EntityKind::SeedImages, images)?,
            decode_rows(EntityKind::Inventory, inventory)?,
            decode_rows(EntityKind::Pricing, pricing)?,
        ))
    }

    pub fn snapshots_loaded(&self) -> bool {
        self.seeds.is_some() && self.inventory.is_some() && self.pricing.is_some()
    }

    pub fn override_map(&self) -> &OverrideMap {
        self.overrides.map()
    }

    /// Recompute the grouped issue list against the wall clock.
    pub fn issues(&self) -> GroupedIssues {
        self.issues_at(Utc::now())
    }

    /// Recompute with an injected clock (expiry checks become
    /// deterministic; this is what the tests call).
    pub fn issues_at(&self, now: DateTime<Utc>) -> GroupedIssues {
        compute_issues(
            self.seeds.as_deref(),
            self.images.as_deref(),
            self.inventory.as_deref(),
            self.pricing.as_deref(),
            self.overrides.map(),
            now,
        )
    }

    /// Inline fix for the collapsed missing/invalid-fields issue.
    pub async fn update_seed(&mut self, seed_id: i64, patch: Value) -> DataQualityResult<()> {
        let issue_key = format!("fields-{}", seed_id);
        let seeds = self.seeds.as_mut().ok_or(DataQualityError::NotLoaded)?;
        let seed = seeds
            .iter_mut()
            .find(|s| s.id == seed_id)
            .ok_or_else(|| DataQualityError::Remediation {
                key: issue_key.clone(),
                message: format!("no seed with id {}", seed_id),
            })?;
        self.dispatcher
            .apply_inline_fix(EntityKind::Seeds, seed_id, seed, &patch, &issue_key)
            .await
    }

    /// Inline fix for incomplete inventory fields, scoped to the lot the
    /// checkers see for this seed.
    pub async fn update_inventory(&mut self, seed_id: i64, patch: Value) -> DataQualityResult<()> {
        self.patch_inventory(seed_id, patch, &format!("inv-fill-{}", seed_id))
            .await
    }

    /// Null out a stale expiration date.
    pub async fn clear_expiration(&mut self, seed_id: i64) -> DataQualityResult<()> {
        self.patch_inventory(
            seed_id,
            serde_json::json!({ "expiration_date": null }),
            &format!("inv-expired-{}", seed_id),
        )
        .await
    }

    /// Clear the needs-reorder flag after the purchase has been made.
    pub async fn mark_reorder_resolved(&mut self, seed_id: i64) -> DataQualityResult<()> {
        self.patch_inventory(
            seed_id,
            serde_json::json!({ "buy_more": false }),
            &format!("inv-buymore-{}", seed_id),
        )
        .await
    }

    async fn patch_inventory(
        &mut self,
        seed_id: i64,
        patch: Value,
        issue_key: &str,
    ) -> DataQualityResult<()> {
        let lots = self.inventory.as_mut().ok_or(DataQualityError::NotLoaded)?;
        // rev(): with duplicate lots the index keeps the last one, so
        // patch that same row
        let lot = lots
            .iter_mut()
            .rev()
            .find(|l| l.seed_id == seed_id)
            .ok_or_else(|| DataQualityError::Remediation {
                key: issue_key.to_string(),
                message: format!("no inventory row for seed {}", seed_id),
            })?;
        let row_id = lot.id;
        self.dispatcher
            .apply_inline_fix(EntityKind::Inventory, row_id, lot, &patch, issue_key)
            .await
    }

    /// Inline fix for pricing fields, scoped to the row the checkers see
    /// for this seed.
    pub async fn update_pricing(&mut self, seed_id: i64, patch: Value) -> DataQualityResult<()> {
        self.patch_pricing(seed_id, patch, &format!("pr-retail-{}", seed_id))
            .await
    }

    /// Convenience wrapper over [`DataQualityEngine::update_pricing`] for
    /// the common missing/zero retail price fix.
    pub async fn set_retail_price(
        &mut self,
        seed_id: i64,
        price: Option<f64>,
    ) -> DataQualityResult<()> {
        self.update_pricing(seed_id, serde_json::json!({ "retail_price": price }))
            .await
    }

    async fn patch_pricing(
        &mut self,
        seed_id: i64,
        patch: Value,
        issue_key: &str,
    ) -> DataQualityResult<()> {
        let rows = self.pricing.as_mut().ok_or(DataQualityError::NotLoaded)?;
        let row = rows
            .iter_mut()
            .rev()
            .find(|p| p.seed_id == seed_id)
            .ok_or_else(|| DataQualityError::Remediation {
                key: issue_key.to_string(),
                message: format!("no pricing row for seed {}", seed_id),
            })?;
        let row_id = row.id;
        self.dispatcher
            .apply_inline_fix(EntityKind::Pricing, row_id, row, &patch, issue_key)
            .await
    }

    /// Flip the acknowledgment on a duplicate-name override. The member
    /// seed ids are re-derived from the current catalog so the persisted
    /// record always names the seeds it covers.
    pub async fn toggle_duplicate_override(
        &mut self,
        key: &str,
    ) -> DataQualityResult<OverrideRecord> {
        let seeds = self.seeds.as_ref().ok_or(DataQualityError::NotLoaded)?;
        let seed_ids: Vec<i64> = seeds
            .iter()
            .filter(|s| normalize_name(&s.name) == key)
            .map(|s| s.id)
            .collect();
        let acknowledged = self
            .overrides
            .map()
            .get(key)
            .map(|r| r.acknowledged)
            .unwrap_or(false);
        self.overrides
            .upsert(OverrideKind::DuplicateName, key, seed_ids, !acknowledged)
            .await
    }

    /// Fire-and-forget external task for "notify" remediations (no
    /// inventory/pricing row). Never fails the caller.
    pub async fn notify_missing_row(&self, seed_id: i64, title: &str, context: &str) {
        self.dispatcher.notify(title, context, seed_id).await;
    }
}
