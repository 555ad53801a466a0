//! Recipe Sync - game item recipe catalog
//!
//! Syncs the item feed to SQLite, announces new items and answers recipe
//! lookups. Runs continuously with a daily sync schedule by default.

use clap::{Parser, Subcommand};
use recipe_sync::web::{self, AppState};
use recipe_sync::{
    scheduler, FeedSource, Ingestor, Lookup, MemoryStore, Notifier, QueryEngine, SharedStore,
    SqliteStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Game item recipe catalog - syncs the item feed and answers recipe lookups
#[derive(Parser, Debug)]
#[command(name = "recipe_sync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, env = "RECIPE_DB", default_value_t = default_db_path())]
    database: String,

    /// Item feed: JSON file path or http(s) URL
    #[arg(short, long, env = "RECIPE_FEED", default_value = "items.json")]
    feed: String,

    /// Incoming-webhook URL for new item announcements (default: log only)
    #[arg(long, env = "RECIPE_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Keep the catalog in memory instead of SQLite (nothing is persisted)
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Sync on a schedule until ctrl-c (default)
    Run {
        /// Sync interval in hours (at most one year)
        #[arg(
            long,
            default_value_t = 24,
            value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_HOURS)
        )]
        interval_hours: u64,

        /// Enable the web API on the specified port (default: disabled)
        #[arg(long)]
        web_port: Option<u16>,
    },
    /// Sync once and exit
    Sync,
    /// Show the recipe for an item, or suggestions if the name is not exact
    Recipe {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List items whose name contains a keyword
    Search {
        #[arg(required = true, num_args = 1..)]
        keyword: Vec<String>,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Print catalog statistics
    Stats,
}

const MAX_INTERVAL_HOURS: u64 = 24 * 365;

/// Returns the default database path: ~/.local/share/recipe_sync/catalog.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recipe_sync")
        .join("catalog.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting recipe_sync...");

    let store = match open_store(&args) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open catalog: {}", e);
            std::process::exit(1);
        }
    };

    let feed = FeedSource::parse(&args.feed);
    let notifier = match &args.webhook_url {
        Some(url) => Notifier::webhook(url),
        None => Notifier::Log,
    };
    let ingestor = Arc::new(Ingestor::new(store.clone()));

    let command = args.command.unwrap_or(Command::Run {
        interval_hours: 24,
        web_port: None,
    });

    match command {
        Command::Run {
            interval_hours,
            web_port,
        } => {
            // Spawn web server if --web-port specified
            if let Some(port) = web_port {
                let state = AppState::new(
                    store.clone(),
                    Arc::clone(&ingestor),
                    feed.clone(),
                    notifier.clone(),
                );
                tokio::spawn(async move {
                    if let Err(e) = web::serve(state, port).await {
                        log::error!("Web server error: {}", e);
                    }
                });
            }

            let every = Duration::from_secs(interval_hours * 3600);
            scheduler::run_daemon(ingestor, feed, notifier, every).await;
        }
        Command::Sync => match scheduler::run_once(&ingestor, &feed, &notifier).await {
            Ok(report) => {
                println!(
                    "Synced {} items: {} new, {} skipped",
                    report.processed,
                    report.new_items.len(),
                    report.skipped
                );
            }
            Err(e) => {
                log::error!("Sync failed: {}", e);
                std::process::exit(1);
            }
        },
        Command::Recipe { name, limit } => {
            let query = name.join(" ");
            let queries = QueryEngine::new(store);
            match queries.lookup(&query, limit) {
                Ok(lookup) => print!("{}", render_lookup(&query, &lookup)),
                Err(e) => {
                    log::error!("Lookup failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Search { keyword, limit } => {
            let keyword = keyword.join(" ");
            let queries = QueryEngine::new(store);
            match queries.suggest(&keyword, limit) {
                Ok(items) if items.is_empty() => {
                    println!("No items match '{}'", keyword);
                }
                Ok(items) => {
                    println!("Items found:");
                    for item in items {
                        println!("  {} (ID {})", item.name, item.id);
                    }
                }
                Err(e) => {
                    log::error!("Search failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Stats => match store.count() {
            Ok(count) => println!("Items in catalog: {}", count),
            Err(e) => {
                log::error!("Failed to count items: {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Open the configured store, creating the database directory if needed
fn open_store(args: &Args) -> recipe_sync::Result<SharedStore> {
    if args.in_memory {
        log::info!("Using in-memory catalog");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db_path = PathBuf::from(&args.database);
    log::info!("Database path: {}", db_path.display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            log::info!("Created directory: {}", parent.display());
        }
    }

    Ok(Arc::new(SqliteStore::open(&db_path)?))
}

/// Plain-text rendering of a recipe lookup for the terminal
fn render_lookup(query: &str, lookup: &Lookup) -> String {
    match lookup {
        Lookup::Found(item) => {
            let mut out = format!("Recipe for {}:\n{}\n", item.name, item.recipe);
            if let Some(tier) = item.tier {
                out.push_str(&format!("Tier: {}\n", tier));
            }
            if let Some(url) = &item.image_url {
                out.push_str(&format!("Image: {}\n", url));
            }
            out
        }
        Lookup::Suggestions(items) => {
            let mut out = format!("No exact match for '{}'. Did you mean:\n", query);
            for item in items {
                out.push_str(&format!("  {}\n", item.name));
            }
            out
        }
        Lookup::NotFound => format!("No recipe found for '{}'\n", query),
    }
}
