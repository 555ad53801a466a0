//! SQLite-backed catalog store
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Each upsert runs in its own transaction so it is committed before returning.

use super::{CatalogStore, Upsert};
use crate::error::{Result, SyncError};
use recipe_common::{normalize_name, Item, ItemSummary, NO_RECIPE};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Initialize the database schema
///
/// Creates the `items` table if it doesn't exist. `id` is the primary key and
/// `name_key` (the normalized name) carries the uniqueness constraint used for
/// overwrites. A table left by an older release without `name_key` is
/// migrated in place.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL UNIQUE,
            tier INTEGER,
            recipe TEXT NOT NULL,
            image_url TEXT,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    if !has_column(conn, "name_key")? {
        migrate_legacy_items(conn)?;
    }

    log::info!("Database schema initialized");
    Ok(())
}

fn has_column(conn: &Connection, column: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info('items') WHERE name = ?1)",
        params![column],
        |row| row.get(0),
    )
}

/// Add and backfill `name_key` on an `items(id, name, tier, recipe, image_url)`
/// table.
///
/// Rows without a usable name are dropped. When several rows share a
/// normalized name the highest id is kept.
fn migrate_legacy_items(conn: &Connection) -> rusqlite::Result<()> {
    log::warn!("Legacy items table found, adding normalized name keys");
    let tx = conn.unchecked_transaction()?;

    tx.execute("ALTER TABLE items ADD COLUMN name_key TEXT", [])?;
    if !has_column(&tx, "updated_at")? {
        tx.execute(
            "ALTER TABLE items ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
            [],
        )?;
    }

    let rows = {
        let mut stmt = tx.prepare("SELECT id, name FROM items ORDER BY id DESC")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let mut seen = HashSet::new();
    let mut dropped = 0;
    for (id, name) in rows {
        let name = name.unwrap_or_default();
        let key = normalize_name(&name);
        if key.is_empty() || !seen.insert(key.clone()) {
            tx.execute("DELETE FROM items WHERE id = ?1", params![id])?;
            dropped += 1;
            continue;
        }
        tx.execute(
            "UPDATE items SET name = ?1, name_key = ?2 WHERE id = ?3",
            params![name.trim(), &key, id],
        )?;
    }

    tx.execute(
        "UPDATE items SET recipe = ?1 WHERE recipe IS NULL OR trim(recipe) = ''",
        params![NO_RECIPE],
    )?;
    tx.execute("UPDATE items SET image_url = NULL WHERE trim(image_url) = ''", [])?;
    tx.execute_batch("CREATE UNIQUE INDEX IF NOT EXISTS idx_items_name_key ON items(name_key);")?;
    tx.commit()?;

    log::warn!(
        "Migrated legacy items table: {} kept, {} dropped (blank or duplicate name)",
        seen.len(),
        dropped
    );
    Ok(())
}

/// Catalog store over a single SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and initialise the schema
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        log::info!("Opened database: {}", path.display());
        Self::from_connection(conn)
    }

    /// Fresh in-memory database, mostly for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SyncError::Store("database connection lock poisoned".to_string()))
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        tier: row.get(2)?,
        recipe: row.get(3)?,
        image_url: row.get(4)?,
    })
}

impl CatalogStore for SqliteStore {
    fn upsert(&self, item: &Item) -> Result<Upsert> {
        let key = normalize_name(&item.name);
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existed: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE name_key = ?1)",
            params![&key],
            |row| row.get(0),
        )?;

        // The id now belongs to a differently named item
        let superseded = tx.execute(
            "DELETE FROM items WHERE id = ?1 AND name_key <> ?2",
            params![item.id, &key],
        )?;
        if superseded > 0 {
            log::debug!(
                "Item id {} renamed to '{}', superseding the old record",
                item.id,
                item.name
            );
        }

        tx.execute(
            "INSERT INTO items (id, name, name_key, tier, recipe, image_url, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
             ON CONFLICT(name_key) DO UPDATE SET
                 id         = excluded.id,
                 name       = excluded.name,
                 tier       = excluded.tier,
                 recipe     = excluded.recipe,
                 image_url  = excluded.image_url,
                 updated_at = excluded.updated_at",
            params![
                item.id,
                &item.name,
                &key,
                item.tier,
                &item.recipe,
                &item.image_url,
            ],
        )?;
        tx.commit()?;

        Ok(if existed {
            Upsert::Replaced
        } else {
            Upsert::Inserted
        })
    }

    fn get_by_normalized_name(&self, key: &str) -> Result<Option<Item>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                "SELECT id, name, tier, recipe, image_url FROM items WHERE name_key = ?1",
                params![key],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                "SELECT id, name, tier, recipe, image_url FROM items WHERE id = ?1",
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn list_all(&self) -> Result<Vec<ItemSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached("SELECT id, name FROM items ORDER BY name_key")?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(ItemSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn known_names(&self) -> Result<HashSet<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached("SELECT name_key FROM items")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(names)
    }
}
