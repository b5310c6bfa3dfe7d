//! Current temperature endpoint

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::broadcast::ConnectionRegistry;
use crate::types::CurrentTemperature;
use crate::utils::time::now_iso8601;

/// GET /api/temperature - Current reading snapshot
///
/// Generates a fresh reading on every call; clients use this before
/// subscribing so they have a value while the stream comes up.
pub async fn get_current(State(registry): State<Arc<ConnectionRegistry>>) -> Json<CurrentTemperature> {
    Json(CurrentTemperature {
        temperature: registry.current_reading(),
        timestamp: now_iso8601(),
    })
}
