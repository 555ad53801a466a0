//! Error types for recipe_sync

use recipe_common::MalformedItem;
use std::fmt;

/// Unified error type for recipe_sync operations
#[derive(Debug)]
pub enum SyncError {
    /// HTTP request for the feed failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Feed URL answered with an error status
    HttpStatus(reqwest::StatusCode),
    /// Feed file could not be read
    Io(std::io::Error),
    /// Feed body is not valid JSON
    Parse(serde_json::Error),
    /// Feed is JSON but not a list of item descriptors
    InvalidFeed(String),
    /// One descriptor is missing a required field
    MalformedItem(MalformedItem),
    /// Database operation failed
    Database(rusqlite::Error),
    /// Store could not be used (e.g. lock poisoned by a panicking writer)
    Store(String),
    /// Another sync is already running
    SyncInProgress,
}

/// Broad category of a [`SyncError`], for callers that only care about the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FeedUnreadable,
    MalformedItem,
    StoreUnavailable,
    SyncInProgress,
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Network(_)
            | SyncError::HttpStatus(_)
            | SyncError::Io(_)
            | SyncError::Parse(_)
            | SyncError::InvalidFeed(_) => ErrorKind::FeedUnreadable,
            SyncError::MalformedItem(_) => ErrorKind::MalformedItem,
            SyncError::Database(_) | SyncError::Store(_) => ErrorKind::StoreUnavailable,
            SyncError::SyncInProgress => ErrorKind::SyncInProgress,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Network(e) => write!(f, "Network error: {}", e),
            SyncError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            SyncError::Io(e) => write!(f, "I/O error: {}", e),
            SyncError::Parse(e) => write!(f, "Parse error: {}", e),
            SyncError::InvalidFeed(msg) => write!(f, "Invalid feed: {}", msg),
            SyncError::MalformedItem(e) => write!(f, "Malformed item: {}", e),
            SyncError::Database(e) => write!(f, "Database error: {}", e),
            SyncError::Store(msg) => write!(f, "Store unavailable: {}", msg),
            SyncError::SyncInProgress => write!(f, "A sync is already in progress"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Network(e) => Some(e),
            SyncError::Io(e) => Some(e),
            SyncError::Parse(e) => Some(e),
            SyncError::MalformedItem(e) => Some(e),
            SyncError::Database(e) => Some(e),
            SyncError::HttpStatus(_)
            | SyncError::InvalidFeed(_)
            | SyncError::Store(_)
            | SyncError::SyncInProgress => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Network(err)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Parse(err)
    }
}

impl From<MalformedItem> for SyncError {
    fn from(err: MalformedItem) -> Self {
        SyncError::MalformedItem(err)
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        SyncError::Database(err)
    }
}

/// Result alias for recipe_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
