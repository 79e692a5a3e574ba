//! Webhook API handlers.
//!
//! # Endpoints
//!
//! - `POST {server.webhook_path}` – Open WebUI event webhook (default
//!   `/webhooks/open-webui`)

use axum::{Router, routing::post};

use crate::state::AppState;

mod webhook;

/// Build the webhook API router.
pub fn router(webhook_path: &str) -> Router<AppState> {
    Router::new().route(webhook_path, post(webhook::open_webui_webhook))
}
