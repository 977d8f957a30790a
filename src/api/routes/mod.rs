//! Route handlers.

use axum::Json;
use serde::Serialize;

pub mod graph;
pub mod maps;
pub mod overview;
pub mod recommend;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
