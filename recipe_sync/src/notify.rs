//! Announces newly seen items after a sync
//!
//! Delivery is best effort: failures are logged and never retried.

use crate::error::{Result, SyncError};
use recipe_common::Item;
use serde::Serialize;

/// Destination for new-item announcements
#[derive(Debug, Clone)]
pub enum Notifier {
    /// Write announcements to the log only
    Log,
    /// POST one message per item to an incoming-webhook URL
    Webhook(WebhookNotifier),
}

impl Notifier {
    pub fn webhook(url: &str) -> Self {
        Notifier::Webhook(WebhookNotifier::new(url))
    }

    /// Announce every item. Returns how many announcements were delivered.
    pub async fn notify(&self, items: &[Item]) -> usize {
        if items.is_empty() {
            return 0;
        }
        log::info!("{} new item(s) found", items.len());

        match self {
            Notifier::Log => {
                for item in items {
                    log::info!("{}", format_new_item(item));
                }
                items.len()
            }
            Notifier::Webhook(webhook) => {
                let mut delivered = 0;
                for item in items {
                    match webhook.send(&format_new_item(item)).await {
                        Ok(()) => delivered += 1,
                        Err(e) => log::warn!(
                            "Failed to announce new item '{}' (ID {}): {}",
                            item.name,
                            item.id,
                            e
                        ),
                    }
                }
                delivered
            }
        }
    }
}

/// One-line announcement for a new item
pub fn format_new_item(item: &Item) -> String {
    format!(
        "New item: **{}** (ID {})\nRecipe: {}",
        item.name, item.id, item.recipe
    )
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Incoming-webhook client (`{"content": "..."}` payloads)
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    async fn send(&self, content: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header("User-Agent", "recipe_sync/1.0")
            .json(&WebhookMessage { content })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_common::NO_RECIPE;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dirt_seed() -> Item {
        Item::new(1, "Dirt Seed", Some(1), Some("Dirt"), None)
    }

    #[test]
    fn format_includes_name_id_and_recipe() {
        assert_eq!(
            format_new_item(&dirt_seed()),
            "New item: **Dirt Seed** (ID 1)\nRecipe: Dirt"
        );
    }

    #[test]
    fn format_shows_placeholder_recipe() {
        let item = Item::new(2, "Rock Seed", None, None, None);
        assert!(format_new_item(&item).ends_with(NO_RECIPE));
    }

    #[tokio::test]
    async fn log_notifier_counts_items() {
        let rock = Item::new(2, "Rock Seed", None, None, None);
        assert_eq!(Notifier::Log.notify(&[dirt_seed(), rock]).await, 2);
        assert_eq!(Notifier::Log.notify(&[]).await, 0);
    }

    #[tokio::test]
    async fn webhook_posts_one_message_per_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({
                "content": "New item: **Dirt Seed** (ID 1)\nRecipe: Dirt"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::webhook(&format!("{}/hook", server.uri()));
        assert_eq!(notifier.notify(&[dirt_seed()]).await, 1);
    }

    #[tokio::test]
    async fn webhook_failures_are_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let notifier = Notifier::webhook(&format!("{}/hook", server.uri()));
        let rock = Item::new(2, "Rock Seed", None, None, None);
        assert_eq!(notifier.notify(&[dirt_seed(), rock]).await, 0);
    }
}
