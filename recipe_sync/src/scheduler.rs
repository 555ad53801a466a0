//! Periodic sync driver
//!
//! Runs a sync immediately, then once per interval, and forwards newly seen
//! items to the notifier.

use crate::error::Result;
use crate::feed::FeedSource;
use crate::ingest::{Ingestor, SyncReport};
use crate::notify::Notifier;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Run a single sync and announce its new items
pub async fn run_once(
    ingestor: &Arc<Ingestor>,
    feed: &FeedSource,
    notifier: &Notifier,
) -> Result<SyncReport> {
    let report = ingestor.run(feed).await?;
    if !report.new_items.is_empty() {
        let delivered = notifier.notify(&report.new_items).await;
        log::info!(
            "Announced {} of {} new item(s)",
            delivered,
            report.new_items.len()
        );
    }
    Ok(report)
}

/// Run the sync daemon until ctrl-c
pub async fn run_daemon(
    ingestor: Arc<Ingestor>,
    feed: FeedSource,
    notifier: Notifier,
    every: Duration,
) {
    run_daemon_until(ingestor, feed, notifier, every, shutdown_signal()).await;
}

/// Run the sync daemon until `shutdown` completes.
///
/// A sync that is still running at shutdown is abandoned; the next start
/// re-syncs the full snapshot.
pub async fn run_daemon_until<F>(
    ingestor: Arc<Ingestor>,
    feed: FeedSource,
    notifier: Notifier,
    every: Duration,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    log::info!(
        "Running in daemon mode, syncing {} every {} second(s)",
        feed,
        every.as_secs()
    );
    let mut ticker = interval(every);
    tokio::pin!(shutdown);

    loop {
        // First tick completes immediately
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        log::info!("Scheduled sync triggered");
        tokio::select! {
            _ = &mut shutdown => {
                log::warn!("Shutdown requested during sync, abandoning run");
                break;
            }
            result = run_once(&ingestor, &feed, &notifier) => {
                if let Err(e) = result {
                    log::error!("Scheduled sync failed: {}", e);
                }
            }
        }
    }

    log::info!("Scheduler stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
