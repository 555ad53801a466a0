//! Web API for recipe lookups
//!
//! JSON endpoints for exact recipe lookup with suggestions, keyword search,
//! item details and manually triggered syncs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::ErrorKind;
use crate::feed::FeedSource;
use crate::ingest::{Ingestor, SyncReport};
use crate::notify::Notifier;
use crate::query::{Lookup, QueryEngine};
use crate::scheduler::run_once;
use crate::store::SharedStore;
use recipe_common::Item;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
    queries: QueryEngine,
    ingestor: Arc<Ingestor>,
    feed: FeedSource,
    notifier: Notifier,
}

impl AppState {
    pub fn new(
        store: SharedStore,
        ingestor: Arc<Ingestor>,
        feed: FeedSource,
        notifier: Notifier,
    ) -> Self {
        Self {
            queries: QueryEngine::new(store.clone()),
            store,
            ingestor,
            feed,
            notifier,
        }
    }
}

/// Recipe lookup parameters
#[derive(Deserialize)]
struct RecipeParams {
    name: String,
    #[serde(default = "default_suggestion_limit")]
    limit: usize,
}

/// Search query parameters
#[derive(Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_suggestion_limit() -> usize {
    10
}

fn default_limit() -> usize {
    20
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn ok<T>(data: T) -> ApiResult<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

fn fail<T>(status: StatusCode, message: impl Into<String>) -> ApiResult<T> {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
}

/// Catalog health summary
#[derive(Serialize)]
struct Health {
    count: usize,
    last_sync: Option<DateTime<Utc>>,
}

/// GET /api/health
async fn health_handler(State(state): State<AppState>) -> ApiResult<Health> {
    match state.store.count() {
        Ok(count) => ok(Health {
            count,
            last_sync: state.ingestor.last_sync(),
        }),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            fail(StatusCode::SERVICE_UNAVAILABLE, "Catalog unavailable")
        }
    }
}

/// GET /api/recipe?name={name}&limit={limit}
async fn recipe_handler(
    State(state): State<AppState>,
    Query(params): Query<RecipeParams>,
) -> ApiResult<Lookup> {
    match state.queries.lookup(&params.name, params.limit) {
        Ok(Lookup::NotFound) => fail(
            StatusCode::NOT_FOUND,
            format!("No item matches '{}'", params.name.trim()),
        ),
        Ok(lookup) => ok(lookup),
        Err(e) => {
            log::error!("Recipe lookup error: {}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Lookup failed")
        }
    }
}

/// GET /api/search?q={query}&limit={limit}
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Item>> {
    match state.queries.suggest(&params.q, params.limit) {
        Ok(items) => ok(items),
        Err(e) => {
            log::error!("Search error: {}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Search failed")
        }
    }
}

/// GET /api/items/{id}
async fn item_handler(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Item> {
    match state.store.get_by_id(id) {
        Ok(Some(item)) => ok(item),
        Ok(None) => fail(StatusCode::NOT_FOUND, format!("No item with ID {}", id)),
        Err(e) => {
            log::error!("Database error: {}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Lookup failed")
        }
    }
}

/// POST /api/sync
async fn sync_handler(State(state): State<AppState>) -> ApiResult<SyncReport> {
    match run_once(&state.ingestor, &state.feed, &state.notifier).await {
        Ok(report) => ok(report),
        Err(e) => {
            log::error!("Manual sync failed: {}", e);
            match e.kind() {
                ErrorKind::SyncInProgress => {
                    fail(StatusCode::CONFLICT, "A sync is already in progress")
                }
                ErrorKind::FeedUnreadable => {
                    fail(StatusCode::BAD_GATEWAY, "Item feed could not be read")
                }
                ErrorKind::StoreUnavailable | ErrorKind::MalformedItem => {
                    fail(StatusCode::INTERNAL_SERVER_ERROR, "Sync failed")
                }
            }
        }
    }
}

/// Build the web server router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/recipe", get(recipe_handler))
        .route("/api/search", get(search_handler))
        .route("/api/items/{id}", get(item_handler))
        .route("/api/sync", post(sync_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the web server (async)
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Web API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[path = "web_tests.rs"]
mod tests;
