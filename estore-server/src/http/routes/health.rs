//! Liveness endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::{AppState, StorageBackend};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub storage: StorageBackend,
    pub version: &'static str,
}

/// GET /health - process is up; names the storage it is wired to
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        storage: state.backend,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
