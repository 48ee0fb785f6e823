use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

/// `/roster` routes — teacher-only, guarded by the parent router.
pub fn roster_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::upload_roster))
        .route("/", get(get::list_roster))
}
