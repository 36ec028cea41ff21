//! Public and health endpoints

use crate::api::models::HealthResponse;
use crate::auth::models::MessageResponse;
use axum::Json;
use chrono::Utc;

/// Handler for GET /public - Open to anyone
pub async fn public_route() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "This route is public and accessible to anyone!",
    ))
}

/// Handler for GET /health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().timestamp(),
    })
}
