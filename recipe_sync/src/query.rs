//! Query engine: resolves user-typed item names against the catalog
//!
//! Resolution is two steps: exact match on the normalized name, then a
//! substring suggestion list. There is no single "best guess" fallback.

use crate::error::Result;
use crate::store::SharedStore;
use recipe_common::{normalize_name, Item};
use serde::Serialize;

/// Result of [`QueryEngine::lookup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Lookup {
    Found(Item),
    /// No exact match; candidates containing the query, never empty
    Suggestions(Vec<Item>),
    NotFound,
}

/// Read-only queries over a catalog store
#[derive(Clone)]
pub struct QueryEngine {
    store: SharedStore,
}

impl QueryEngine {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Exact (normalized) name lookup. `Ok(None)` when nothing matches.
    pub fn resolve_recipe(&self, query: &str) -> Result<Option<Item>> {
        let key = normalize_name(query);
        if key.is_empty() {
            return Ok(None);
        }
        self.store.get_by_normalized_name(&key)
    }

    /// Items whose normalized name contains the normalized query.
    ///
    /// Ordered by normalized name, capped at `limit`. A blank query matches
    /// nothing.
    pub fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        let needle = normalize_name(query);
        if needle.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for summary in self.store.list_all()? {
            if items.len() >= limit {
                break;
            }
            if !normalize_name(&summary.name).contains(&needle) {
                continue;
            }
            // A concurrent sync may have renamed or removed the record since listing
            match self.store.get_by_id(summary.id)? {
                Some(item) if normalize_name(&item.name).contains(&needle) => items.push(item),
                _ => {}
            }
        }

        log::debug!("Suggestions for '{}': {} match(es)", query, items.len());
        Ok(items)
    }

    /// Exact match if there is one, otherwise the suggestion list.
    pub fn lookup(&self, query: &str, limit: usize) -> Result<Lookup> {
        if let Some(item) = self.resolve_recipe(query)? {
            return Ok(Lookup::Found(item));
        }

        let suggestions = self.suggest(query, limit)?;
        if suggestions.is_empty() {
            Ok(Lookup::NotFound)
        } else {
            Ok(Lookup::Suggestions(suggestions))
        }
    }
}
