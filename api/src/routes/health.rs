use crate::response::ApiResponse;
use axum::{Json, Router, http::StatusCode, routing::get};
use util::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /api/health
///
/// Liveness probe; no authentication required.
async fn health() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::OK, Json(ApiResponse::success((), "ok")))
}
