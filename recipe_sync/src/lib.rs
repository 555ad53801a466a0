//! Recipe Sync - game item recipe catalog
//!
//! Syncs the item feed into a SQLite catalog on a daily schedule, announces
//! newly added items, and resolves recipe lookups with "did you mean"
//! suggestions.

pub mod error;
pub mod feed;
pub mod ingest;
pub mod notify;
pub mod query;
pub mod scheduler;
pub mod store;
pub mod web;

pub use error::{ErrorKind, Result, SyncError};
pub use feed::FeedSource;
pub use ingest::{Ingestor, SyncReport};
pub use notify::Notifier;
pub use query::{Lookup, QueryEngine};
pub use store::{CatalogStore, MemoryStore, SharedStore, SqliteStore, Upsert};
