use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

pub type AppState<S> = Arc<S>;

/// Plain confirmation returned by delete endpoints
pub const DELETED: &str = "item deleted";

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
