//! Error types shared across the recipe catalog crates

use thiserror::Error;

/// A single feed descriptor that could not be turned into an [`Item`](crate::Item).
///
/// Ingestion treats this as a per-item failure: the descriptor is skipped and
/// the rest of the snapshot is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedItem {
    /// Descriptor is not a JSON object
    #[error("descriptor is not an object")]
    NotAnObject,
    /// Required field absent or null
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// `name` present but blank
    #[error("item {id} has an empty name")]
    EmptyName { id: i64 },
    /// A field has the wrong JSON type
    #[error("invalid field value: {0}")]
    InvalidField(String),
}
