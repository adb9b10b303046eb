//! Remediation Dispatcher: forwards inline fixes to the storage
//! collaborator and reconciles the local snapshot on success, and fires
//! best-effort notifications at the external task tracker.
//!
//! An inline fix is all-or-nothing per entity: the patch is only merged
//! into the locally held record after the backend write succeeds, so a
//! failed write leaves both the snapshot and the issue list untouched.
//! Concurrent fixes on *different* entities need no coordination (each
//! write is scoped to one row id); two fixes racing on the same entity are
//! last-write-wins at the storage layer, by accepted limitation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{DataQualityError, DataQualityResult};
use crate::store::{apply_patch, StoreClient, TaskTracker};
use crate::types::EntityKind;

pub struct RemediationDispatcher {
    store: Arc<dyn StoreClient>,
    tasks: Arc<dyn TaskTracker>,
}

impl RemediationDispatcher {
    pub fn new(store: Arc<dyn StoreClient>, tasks: Arc<dyn TaskTracker>) -> Self {
        Self { store, tasks }
    }

    /// Send a minimal patch for one row and, once the backend accepts it,
    /// merge the same patch into the locally held record. `issue_key`
    /// only labels the error when the write fails.
    pub async fn apply_inline_fix<T>(
        &self,
        kind: EntityKind,
        row_id: i64,
        row: &mut T,
        patch: &Value,
        issue_key: &str,
    ) -> DataQualityResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.store
            .update(kind, row_id, patch.clone())
            .await
            .map_err(|e| DataQualityError::Remediation {
                key: issue_key.to_string(),
                message: e.to_string(),
            })?;

        *row = apply_patch(row, patch).map_err(|e| DataQualityError::Decode {
            entity: kind.as_str().to_string(),
            message: e.to_string(),
        })?;

        log::info!("Applied fix for {} ({} row {})", issue_key, kind.as_str(), row_id);
        Ok(())
    }

    /// Fire-and-forget task creation for "notify" remediations. Failure is
    /// logged and swallowed: the missing row stays visible as an issue, so
    /// nothing is lost if the tracker is down.
    pub async fn notify(&self, title: &str, context: &str, seed_id: i64) {
        let metadata = serde_json::json!({
            "seed_id": seed_id,
            "source": "data-quality",
        });
        match self.tasks.create_task(title, context, metadata).await {
            Ok(()) => log::info!("Created task for seed {}: {}", seed_id, title),
            Err(e) => log::warn!("Task creation failed (not blocking): {}", e),
        }
    }
}
