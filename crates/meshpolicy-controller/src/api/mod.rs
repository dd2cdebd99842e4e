//! Snapshot API consumed by the proxy-configuration generator.
//!
//! - `/v1/snapshot`         : full published snapshot (JSON)
//! - `/v1/snapshot/summary` : generation plus entry counts

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;

fn not_published() -> Response {
    let body = Json(json!({
        "error": "NOT_PUBLISHED",
        "message": "no snapshot has been published yet",
    }));
    (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
}

pub async fn snapshot(State(state): State<AppState>) -> Response {
    match state.store().current() {
        Some(published) => Json(published.as_ref()).into_response(),
        None => not_published(),
    }
}

pub async fn summary(State(state): State<AppState>) -> Response {
    match state.store().current() {
        Some(published) => Json(json!({
            "generation": published.generation,
            "summary": published.snapshot.summary(),
        }))
        .into_response(),
        None => not_published(),
    }
}
