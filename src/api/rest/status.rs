//! Server status endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::broadcast::ConnectionRegistry;

/// Response for GET /api/status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    /// Number of currently attached subscribers
    pub active_subscribers: usize,
    /// Whether the broadcast timer is running
    pub streaming: bool,
}

/// GET /api/status - Diagnostics for the broadcast lifecycle
pub async fn get_status(State(registry): State<Arc<ConnectionRegistry>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_subscribers: registry.subscriber_count(),
        streaming: registry.is_streaming(),
    })
}
