//! Catalog store: durable mapping from item identity to item record
//!
//! Identity for overwrites is the normalized name. Every write is durable
//! before the call returns, so ingestion can diff against post-write state.

mod memory;
mod sqlite;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryStore;
pub use sqlite::{init_schema, SqliteStore};

use crate::error::Result;
use recipe_common::{normalize_name, Item, ItemSummary};
use std::collections::HashSet;
use std::sync::Arc;

/// Outcome of a successful [`CatalogStore::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// No record with this normalized name existed
    Inserted,
    /// The record with this normalized name was overwritten
    Replaced,
}

/// Storage backend for the item catalog
pub trait CatalogStore: Send + Sync {
    /// Insert the item, or replace the record sharing its normalized name.
    ///
    /// A stored record that carries the same `id` under a different name is
    /// superseded by the incoming one.
    fn upsert(&self, item: &Item) -> Result<Upsert>;

    fn get_by_normalized_name(&self, key: &str) -> Result<Option<Item>>;

    fn get_by_id(&self, id: i64) -> Result<Option<Item>>;

    /// All `(id, name)` pairs ordered by normalized name ascending
    fn list_all(&self) -> Result<Vec<ItemSummary>>;

    fn count(&self) -> Result<usize>;

    /// Normalized names currently stored
    fn known_names(&self) -> Result<HashSet<String>> {
        Ok(self
            .list_all()?
            .iter()
            .map(|summary| normalize_name(&summary.name))
            .collect())
    }
}

/// Store handle shared by the ingestor, query engine and web handlers
pub type SharedStore = Arc<dyn CatalogStore>;
