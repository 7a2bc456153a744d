//! Link store seam and its in-memory implementation.
//!
//! [`LinkStore`] is the contract the service expects from persistent
//! storage. [`MemoryLinkStore`] keeps everything in concurrent maps and can
//! round-trip its contents through a JSON snapshot file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::data_structures::collision_resolver::ResolutionStrategy;
use crate::error::store::{StoreError, StoreResult};
use crate::service::record::LinkRecord;

/// Persistent storage for link records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Creates a record for `original_url` and returns its id.
    async fn insert_record(&self, original_url: &str) -> StoreResult<i64>;

    /// Assigns the final short code to record `id`.
    async fn update_code(
        &self,
        id: i64,
        code: &str,
        collision_resolved: bool,
        resolution_strategy: Option<ResolutionStrategy>,
    ) -> StoreResult<()>;

    /// Looks a record up by short code.
    async fn get_by_code(&self, code: &str) -> StoreResult<Option<LinkRecord>>;

    /// Looks a record up by the URL it points to.
    async fn get_by_original(&self, original_url: &str) -> StoreResult<Option<LinkRecord>>;

    /// Adds one click to the record owning `code` and returns the new total.
    async fn increment_clicks(&self, code: &str) -> StoreResult<u64>;

    /// Returns up to `limit` coded records, most clicked first.
    async fn get_top_records(&self, limit: usize) -> StoreResult<Vec<LinkRecord>>;

    /// Returns every record, in id order.
    async fn get_all_records(&self) -> StoreResult<Vec<LinkRecord>>;

    /// Deletes the record owning `code`.
    async fn delete_record(&self, code: &str) -> StoreResult<bool>;
}

/// On-disk form of a [`MemoryLinkStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    next_id: i64,
    records: Vec<LinkRecord>,
}

/// A [`LinkStore`] held entirely in memory.
///
/// Lookups by code and by URL go through secondary maps. No operation holds a
/// guard into one map while touching another.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    records: DashMap<i64, LinkRecord>,
    codes: DashMap<String, i64>,
    urls: DashMap<String, i64>,
    last_id: AtomicI64,
    snapshot_path: Option<PathBuf>,
}

impl MemoryLinkStore {
    /// Creates an empty store without a snapshot file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by the snapshot at `path`.
    ///
    /// A missing file yields an empty store that will be written to `path`
    /// on the first [`MemoryLinkStore::save`].
    pub async fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut store = Self::new();

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                tracing::info!(
                    path = %path.display(),
                    records = snapshot.records.len(),
                    "Loaded link snapshot"
                );
                store.restore(snapshot);
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No link snapshot yet, starting empty");
            }
            Err(source) => return Err(StoreError::SnapshotIo { path, source }),
        }

        store.snapshot_path = Some(path);
        Ok(store)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot file this store saves to, if any.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Writes every record to the snapshot file.
    ///
    /// The file is replaced atomically via a sibling temporary file. Stores
    /// without a snapshot path do nothing.
    pub async fn save(&self) -> StoreResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            next_id: self.last_id.load(Ordering::SeqCst),
            records: self.sorted_records(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::SnapshotIo {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|source| StoreError::SnapshotIo {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|source| StoreError::SnapshotIo {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), records = snapshot.records.len(), "Saved link snapshot");
        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let mut last_id = snapshot.next_id;
        for record in snapshot.records {
            last_id = last_id.max(record.id);
            if let Some(code) = &record.short_code {
                self.codes.insert(code.clone(), record.id);
            }
            self.urls.entry(record.original_url.clone()).or_insert(record.id);
            self.records.insert(record.id, record);
        }
        self.last_id.store(last_id, Ordering::SeqCst);
    }

    fn sorted_records(&self) -> Vec<LinkRecord> {
        let mut records: Vec<LinkRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }

    fn id_for_code(&self, code: &str) -> Option<i64> {
        self.codes.get(code).map(|id| *id)
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert_record(&self, original_url: &str) -> StoreResult<i64> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.urls.entry(original_url.to_string()).or_insert(id);
        self.records.insert(id, LinkRecord::new(id, original_url));
        Ok(id)
    }

    async fn update_code(
        &self,
        id: i64,
        code: &str,
        collision_resolved: bool,
        resolution_strategy: Option<ResolutionStrategy>,
    ) -> StoreResult<()> {
        if self.id_for_code(code).is_some_and(|owner| owner != id) {
            return Err(StoreError::DuplicateCode(code.to_string()));
        }
        if !self.records.contains_key(&id) {
            return Err(StoreError::RecordNotFound(id));
        }

        self.codes.insert(code.to_string(), id);

        let (previous, original_url) = {
            let mut record = self
                .records
                .get_mut(&id)
                .ok_or(StoreError::RecordNotFound(id))?;
            record.collision_resolved = collision_resolved;
            record.resolution_strategy =
                resolution_strategy.map(|strategy| strategy.resolved_name().to_string());
            (
                record.short_code.replace(code.to_string()),
                record.original_url.clone(),
            )
        };

        if let Some(previous) = previous.filter(|previous| previous != code) {
            self.codes.remove(&previous);
        }
        // A coded record wins URL lookups over an uncoded one.
        self.urls.insert(original_url, id);
        Ok(())
    }

    async fn get_by_code(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        Ok(self
            .id_for_code(code)
            .and_then(|id| self.records.get(&id).map(|record| record.clone())))
    }

    async fn get_by_original(&self, original_url: &str) -> StoreResult<Option<LinkRecord>> {
        let id = self.urls.get(original_url).map(|id| *id);
        Ok(id.and_then(|id| self.records.get(&id).map(|record| record.clone())))
    }

    async fn increment_clicks(&self, code: &str) -> StoreResult<u64> {
        let id = self
            .id_for_code(code)
            .ok_or_else(|| StoreError::CodeNotFound(code.to_string()))?;
        let mut record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| StoreError::CodeNotFound(code.to_string()))?;
        record.clicks += 1;
        Ok(record.clicks)
    }

    async fn get_top_records(&self, limit: usize) -> StoreResult<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self
            .sorted_records()
            .into_iter()
            .filter(|record| record.short_code.is_some())
            .collect();
        // Stable sort keeps id order among equal click counts.
        records.sort_by(|a, b| b.clicks.cmp(&a.clicks));
        records.truncate(limit);
        Ok(records)
    }

    async fn get_all_records(&self) -> StoreResult<Vec<LinkRecord>> {
        Ok(self.sorted_records())
    }

    async fn delete_record(&self, code: &str) -> StoreResult<bool> {
        let Some((_, id)) = self.codes.remove(code) else {
            return Ok(false);
        };
        if let Some((_, record)) = self.records.remove(&id) {
            self.urls
                .remove_if(&record.original_url, |_, owner| *owner == id);
        }
        Ok(true)
    }
}
