use axum::{
    Router,
    routing::{delete, get, post},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;

/// `/codes` routes — the teacher's code control panel. The whole group is
/// wrapped in `allow_teacher` by the parent router.
pub fn codes_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::generate_code))
        .route("/", delete(delete::revoke_code))
        .route("/active", get(get::active_code))
}
