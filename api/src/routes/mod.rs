//! HTTP route entry point for `/api/...`.
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Signup, login and profile setup (login/signup public)
//! - `/codes` → Daily-code control panel (teachers)
//! - `/attendance` → Code submission, sweep, reports and analytics
//! - `/roster` → Class roster upload and listing (teachers)

use crate::auth::guards::allow_teacher;
use crate::routes::{
    attendance::attendance_routes, auth::auth_routes, codes::codes_routes, health::health_routes,
    roster::roster_routes,
};
use axum::{Router, middleware::from_fn_with_state};
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod codes;
pub mod common;
pub mod health;
pub mod roster;

/// Builds the complete application router for all HTTP endpoints.
///
/// Role guards are applied per group: `/codes` and `/roster` are
/// teacher-only, `/attendance` splits per route inside its own module,
/// and the profile routes under `/auth` only need authentication.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/codes",
            codes_routes().route_layer(from_fn_with_state(app_state.clone(), allow_teacher)),
        )
        .nest("/attendance", attendance_routes(app_state.clone()))
        .nest(
            "/roster",
            roster_routes().route_layer(from_fn_with_state(app_state, allow_teacher)),
        )
}
