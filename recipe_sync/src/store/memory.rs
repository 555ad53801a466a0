//! In-memory catalog store with the same overwrite rules as [`SqliteStore`](super::SqliteStore)

use super::{CatalogStore, Upsert};
use crate::error::{Result, SyncError};
use recipe_common::{normalize_name, Item, ItemSummary};
use std::collections::{BTreeMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Catalog held in a `BTreeMap` keyed by normalized name
///
/// Nothing is persisted; used for dry runs and as a test double.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Item>>> {
        self.items
            .read()
            .map_err(|_| SyncError::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Item>>> {
        self.items
            .write()
            .map_err(|_| SyncError::Store("memory store lock poisoned".to_string()))
    }
}

impl CatalogStore for MemoryStore {
    fn upsert(&self, item: &Item) -> Result<Upsert> {
        let key = normalize_name(&item.name);
        let mut items = self.write()?;
        items.retain(|existing_key, existing| existing.id != item.id || *existing_key == key);

        Ok(match items.insert(key, item.clone()) {
            Some(_) => Upsert::Replaced,
            None => Upsert::Inserted,
        })
    }

    fn get_by_normalized_name(&self, key: &str) -> Result<Option<Item>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.read()?.values().find(|item| item.id == id).cloned())
    }

    fn list_all(&self) -> Result<Vec<ItemSummary>> {
        Ok(self.read()?.values().map(ItemSummary::from).collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    fn known_names(&self) -> Result<HashSet<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }
}
