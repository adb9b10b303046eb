//! Storage and task-tracking collaborator seams.
//!
//! The engine never talks to a concrete backend. It receives a
//! [`StoreClient`] (generic fetch/update/insert over named collections) and
//! a [`TaskTracker`] (fire-and-forget external task creation) at
//! construction time, which keeps every computation deterministic under
//! test and leaves connection handling, auth and retries to the host
//! application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::EntityKind;

/// Errors surfaced by storage collaborators
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Backend error on {entity}: {message}")]
    Backend { entity: String, message: String },

    #[error("No {entity} row with id {id}")]
    NotFound { entity: String, id: i64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn backend(kind: EntityKind, message: impl Into<String>) -> Self {
        StoreError::Backend {
            entity: kind.as_str().to_string(),
            message: message.into(),
        }
    }
}

/// Generic query/update client over the relational store.
///
/// Rows travel as JSON objects; the engine decodes them into the typed
/// entities in `types`. `update` applies a partial patch (object of
/// column -> new value, `null` meaning "set to NULL") to the row whose
/// `id` column matches.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Bulk read of an entire collection
    async fn fetch_all(&self, kind: EntityKind) -> StoreResult<Vec<Value>>;

    /// Targeted partial update by row identifier
    async fn update(&self, kind: EntityKind, id: i64, patch: Value) -> StoreResult<()>;

    /// Insert a new row; returns the stored row including its assigned id
    async fn insert(&self, kind: EntityKind, record: Value) -> StoreResult<Value>;
}

/// External task-tracking collaborator for "notify" remediations
#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn create_task(&self, title: &str, notes: &str, metadata: Value) -> StoreResult<()>;
}

/// Shallow-merge a JSON patch object into a JSON row object.
/// Patch keys overwrite row keys; explicit `null` values are written
/// through (that is how expiration dates get cleared).
pub fn merge_patch(row: &mut Value, patch: &Value) {
    if let (Some(row_map), Some(patch_map)) = (row.as_object_mut(), patch.as_object()) {
        for (k, v) in patch_map {
            row_map.insert(k.clone(), v.clone());
        }
    }
}

/// Apply a JSON patch to a typed record by round-tripping through JSON.
pub fn apply_patch<T>(record: &T, patch: &Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut row = serde_json::to_value(record)?;
    merge_patch(&mut row, patch);
    serde_json::from_value(row)
}

/// In-memory [`StoreClient`] backed by `tokio::sync::RwLock`ed row maps.
///
/// Used by the test suites and by headless embedding of the engine; rows
/// behave like the real backend (id assignment on insert, patch-by-id
/// updates) and individual operations can be forced to fail.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<EntityKind, Vec<Value>>>,
    next_id: AtomicI64,
    fail_fetch: RwLock<Vec<EntityKind>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1000),
            fail_fetch: RwLock::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seed a collection with typed records (panics on serialization
    /// failure, which cannot happen for the entity types here).
    pub async fn put_all<T: Serialize>(&self, kind: EntityKind, records: &[T]) {
        let values: Vec<Value> = records
            .iter()
            .map(|r| serde_json::to_value(r).expect("entity types serialize"))
            .collect();
        self.rows.write().await.insert(kind, values);
    }

    /// Force subsequent `fetch_all` calls for `kind` to fail
    pub async fn fail_fetch(&self, kind: EntityKind) {
        self.fail_fetch.write().await.push(kind);
    }

    /// Force subsequent `update`/`insert` calls to fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of a collection, decoded into typed records
    pub async fn all_decoded<T: DeserializeOwned>(&self, kind: EntityKind) -> Vec<T> {
        self.rows
            .read()
            .await
            .get(&kind)
            .map(|rows| {
                rows.iter()
                    .filter_map(|r| serde_json::from_value(r.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn fetch_all(&self, kind: EntityKind) -> StoreResult<Vec<Value>> {
        if self.fail_fetch.read().await.contains(&kind) {
            return Err(StoreError::backend(kind, "simulated fetch failure"));
        }
        Ok(self.rows.read().await.get(&kind).cloned().unwrap_or_default())
    }

    async fn update(&self, kind: EntityKind, id: i64, patch: Value) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::backend(kind, "simulated write failure"));
        }
        let mut rows = self.rows.write().await;
        let rows = rows.entry(kind).or_default();
        let row = rows
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
            .ok_or(StoreError::NotFound {
                entity: kind.as_str().to_string(),
                id,
            })?;
        merge_patch(row, &patch);
        Ok(())
    }

    async fn insert(&self, kind: EntityKind, mut record: Value) -> StoreResult<Value> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::backend(kind, "simulated write failure"));
        }
        let assigned = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Some(map) = record.as_object_mut() {
            let needs_id = !matches!(map.get("id"), Some(Value::Number(_)));
            if needs_id {
                map.insert("id".to_string(), Value::from(assigned));
            }
        }
        self.rows
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }
}

/// A task created through [`InMemoryTaskTracker`]
#[derive(Debug, Clone)]
pub struct CreatedTask {
    pub title: String,
    pub notes: String,
    pub metadata: Value,
}

/// In-memory [`TaskTracker`] that records created tasks for inspection
#[derive(Debug, Default)]
pub struct InMemoryTaskTracker {
    created: RwLock<Vec<CreatedTask>>,
    fail: AtomicBool,
}

impl InMemoryTaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn created(&self) -> Vec<CreatedTask> {
        self.created.read().await.clone()
    }
}

#[async_trait]
impl TaskTracker for InMemoryTaskTracker {
    async fn create_task(&self, title: &str, notes: &str, metadata: Value) -> StoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                entity: "tasks".to_string(),
                message: "simulated task tracker outage".to_string(),
            });
        }
        self.created.write().await.push(CreatedTask {
            title: title.to_string(),
            notes: notes.to_string(),
            metadata,
        });
        Ok(())
    }
}
