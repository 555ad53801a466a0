//! Ingestion/diff engine
//!
//! Upserts every descriptor of a feed snapshot into the catalog and reports
//! the items whose normalized name was not stored before the sync began.
//! At most one sync runs at a time; overlapping requests are dropped.

use crate::error::{Result, SyncError};
use crate::feed::FeedSource;
use crate::store::SharedStore;
use chrono::{DateTime, Utc};
use recipe_common::{normalize_name, Item};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, TryLockError};

/// Outcome of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Descriptors in the snapshot
    pub processed: usize,
    /// Descriptors written to the store
    pub upserted: usize,
    /// Descriptors skipped for missing or invalid fields
    pub skipped: usize,
    /// Items absent from the catalog before this sync, in feed order
    pub new_items: Vec<Item>,
    pub finished_at: DateTime<Utc>,
}

/// Applies feed snapshots to a catalog store
pub struct Ingestor {
    store: SharedStore,
    sync_lock: Mutex<()>,
    last_sync: Mutex<Option<DateTime<Utc>>>,
}

impl Ingestor {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            sync_lock: Mutex::new(()),
            last_sync: Mutex::new(None),
        }
    }

    /// Completion time of the last successful sync
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        match self.last_sync.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Apply one snapshot to the store.
    ///
    /// Malformed descriptors are logged and skipped. A store failure aborts
    /// the run; writes made before the failure stay committed and are
    /// corrected by the next sync.
    pub fn sync(&self, descriptors: &[Value]) -> Result<SyncReport> {
        let _guard = match self.sync_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                log::warn!("Sync requested while another sync is running, dropping request");
                return Err(SyncError::SyncInProgress);
            }
            // Only guards (), a panicked run leaves nothing to repair
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let known = self.store.known_names()?;
        log::info!(
            "Syncing {} descriptors against {} known items",
            descriptors.len(),
            known.len()
        );

        let mut upserted = 0;
        let mut skipped = 0;
        let mut new_items = Vec::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let item = match Item::from_descriptor(descriptor) {
                Ok(item) => item,
                Err(e) => {
                    log::warn!("Skipping feed entry #{}: {} ({})", index, e, descriptor);
                    skipped += 1;
                    continue;
                }
            };

            if let Err(e) = self.store.upsert(&item) {
                log::error!(
                    "Sync aborted at entry #{} of {}: {}",
                    index,
                    descriptors.len(),
                    e
                );
                return Err(e);
            }
            upserted += 1;

            if !known.contains(&normalize_name(&item.name)) {
                new_items.push(item);
            }
        }

        let finished_at = Utc::now();
        match self.last_sync.lock() {
            Ok(mut guard) => *guard = Some(finished_at),
            Err(poisoned) => *poisoned.into_inner() = Some(finished_at),
        }

        log::info!(
            "Loaded {} items, {} new items ({} skipped)",
            descriptors.len(),
            new_items.len(),
            skipped
        );

        Ok(SyncReport {
            processed: descriptors.len(),
            upserted,
            skipped,
            new_items,
            finished_at,
        })
    }

    /// Fetch the feed and sync it on the blocking thread pool.
    ///
    /// An unreadable feed fails the run before anything is written.
    pub async fn run(self: &Arc<Self>, feed: &FeedSource) -> Result<SyncReport> {
        let descriptors = match feed.fetch().await {
            Ok(descriptors) => descriptors,
            Err(e) => {
                log::error!("Failed to read item feed {}: {}", feed, e);
                return Err(e);
            }
        };

        let ingestor = Arc::clone(self);
        tokio::task::spawn_blocking(move || ingestor.sync(&descriptors))
            .await
            .map_err(|e| SyncError::Store(format!("sync task failed: {}", e)))?
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
