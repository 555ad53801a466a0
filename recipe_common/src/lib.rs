//! Shared types for the item recipe catalog
//!
//! Used by `recipe_sync` for the catalog store, ingestion and queries.

pub mod error;
pub mod item;
pub mod normalize;

pub use error::MalformedItem;
pub use item::{Item, ItemDescriptor, ItemSummary, NO_RECIPE};
pub use normalize::normalize_name;
