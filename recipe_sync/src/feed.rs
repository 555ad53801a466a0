//! Item feed: full snapshot of every item, pulled from a file or URL

use crate::error::{Result, SyncError};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Where the item snapshot is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Local JSON file (e.g. `items.json` written by an external parser)
    File(PathBuf),
    /// JSON document served over HTTP(S)
    Url(String),
}

impl FeedSource {
    /// `http://` and `https://` locations are URLs, anything else is a file path
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            FeedSource::Url(location.to_string())
        } else {
            FeedSource::File(PathBuf::from(location))
        }
    }

    /// Read the whole snapshot.
    ///
    /// Fails with a feed error if the source cannot be read or is not a JSON
    /// array. Individual descriptors are not validated here.
    pub async fn fetch(&self) -> Result<Vec<Value>> {
        let body = match self {
            FeedSource::File(path) => {
                log::info!("Reading item feed from {}", path.display());
                tokio::fs::read_to_string(path).await?
            }
            FeedSource::Url(url) => {
                log::info!("Fetching item feed from {}", url);
                fetch_url(url).await?
            }
        };

        let descriptors = parse_snapshot(&body)?;
        log::info!("Feed snapshot contains {} descriptors", descriptors.len());
        Ok(descriptors)
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => write!(f, "{}", url),
        }
    }
}

async fn fetch_url(url: &str) -> Result<String> {
    let response = reqwest::Client::new()
        .get(url)
        .header("User-Agent", "recipe_sync/1.0")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(SyncError::HttpStatus(response.status()));
    }

    Ok(response.text().await?)
}

/// Parse a snapshot body into its raw descriptors
pub fn parse_snapshot(body: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(descriptors) => Ok(descriptors),
        other => Err(SyncError::InvalidFeed(format!(
            "expected a JSON array of items, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
