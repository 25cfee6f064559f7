//! HTTP routes of the inbox server
//!
//! ## Endpoints
//!
//! - `GET|POST /` - Human-readable page advertising the inbox
//! - `HEAD|OPTIONS {inbox}` - Inbox capabilities
//! - `GET  {inbox}` - The inbox graph, content-negotiated
//! - `POST {inbox}` - Send a notification
//! - `GET  {inbox}{id}` - A single notification, content-negotiated
//! - `GET  /health` - Storage backend and registry sync status

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::engine::InboxResponse;
use crate::state::AppState;
use crate::storage::StoreHealth;

/// Create the router with the inbox mounted at `inbox_path` (e.g. `/inbox/`).
pub fn router(inbox_path: &str) -> Router<AppState> {
    let with_slash = crate::config::normalize_path(inbox_path);
    let without_slash = with_slash.trim_end_matches('/').to_string();
    let notification = format!("{}{{id}}", with_slash);

    let inbox = get(fetch_inbox)
        .post(accept_notification)
        .head(inbox_metadata)
        .options(inbox_metadata);

    Router::new()
        .route("/", get(describe_root).post(describe_root))
        .route("/health", get(health))
        .route(&with_slash, inbox.clone())
        .route(&without_slash, inbox)
        .route(&notification, get(fetch_notification))
}

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn describe_root(State(state): State<AppState>) -> InboxResponse {
    state.engine.describe_root()
}

async fn inbox_metadata(State(state): State<AppState>) -> InboxResponse {
    state.engine.inbox_metadata()
}

async fn fetch_inbox(State(state): State<AppState>, headers: HeaderMap) -> InboxResponse {
    state
        .engine
        .fetch_inbox(header_str(&headers, header::ACCEPT))
        .await
}

async fn accept_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> InboxResponse {
    state
        .engine
        .accept_notification(header_str(&headers, header::CONTENT_TYPE), &body)
        .await
}

async fn fetch_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> InboxResponse {
    state
        .engine
        .fetch_notification(&id, header_str(&headers, header::ACCEPT))
        .await
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub inbox_iri: String,
    #[serde(flatten)]
    pub store: StoreHealth,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.engine.store().health().await;
    let status = match &store.registry_sync {
        Some(sync) if sync.failures > 0 && sync.last_failure > sync.last_success => "degraded",
        _ => "ok",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        inbox_iri: state.engine.inbox().iri().to_string(),
        store,
    })
}
