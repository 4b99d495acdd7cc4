// Liveness endpoint, served on its own port

use axum::{routing::get, Json, Router};

use crate::models::MessageResponse;

/// Router for the health listener
pub fn health_router() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Handler for GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse, example = json!({"message": "OK"}))
    ),
    tag = "health"
)]
pub async fn health_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("OK"))
}
