//! Store doubles shared by unit tests

use super::{CatalogStore, MemoryStore, Upsert};
use crate::error::Result;
use recipe_common::{Item, ItemSummary};
use std::sync::{mpsc, Mutex};

/// Store that parks every upsert until the test releases it
pub(crate) struct GatedStore {
    inner: MemoryStore,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl GatedStore {
    /// Returns the store, a receiver signalled when an upsert is parked, and
    /// a sender that lets one parked upsert through.
    pub(crate) fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Self {
            inner: MemoryStore::new(),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        (store, entered_rx, release_tx)
    }
}

impl CatalogStore for GatedStore {
    fn upsert(&self, item: &Item) -> Result<Upsert> {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.inner.upsert(item)
    }
    fn get_by_normalized_name(&self, key: &str) -> Result<Option<Item>> {
        self.inner.get_by_normalized_name(key)
    }
    fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        self.inner.get_by_id(id)
    }
    fn list_all(&self) -> Result<Vec<ItemSummary>> {
        self.inner.list_all()
    }
    fn count(&self) -> Result<usize> {
        self.inner.count()
    }
}
