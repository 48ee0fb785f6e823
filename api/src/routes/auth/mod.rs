use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;
pub mod put;

/// `/auth` routes: signup and login are public; profile routes only need a
/// valid token (no role yet — the profile is where the role gets chosen).
pub fn auth_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(post::register))
        .route("/login", post(post::login));

    let protected = Router::new()
        .route("/profile", put(put::update_profile))
        .route("/me", get(get::me))
        .route_layer(from_fn(allow_authenticated));

    public.merge(protected)
}
