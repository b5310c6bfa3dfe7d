//! Reading history endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::broadcast::ConnectionRegistry;
use crate::types::HistoryResponse;

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Maximum number of readings to return (default: 10, max: 100)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// GET /api/temperature/history - Recent readings, newest first
pub async fn get_history(
    State(registry): State<Arc<ConnectionRegistry>>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let limit = params.limit.min(100);
    Json(HistoryResponse {
        readings: registry.history().latest(limit),
    })
}
