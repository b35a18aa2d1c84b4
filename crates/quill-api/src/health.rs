use axum::Json;

use quill_types::api::HealthResponse;

/// GET /health — liveness only; does not touch the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
