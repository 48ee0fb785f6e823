use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::{allow_student, allow_teacher};

pub mod common;
pub mod get;
pub mod post;

/// `/attendance` routes. Submission and analytics are student-facing;
/// the sweep and the report surfaces belong to teachers, so the guard is
/// applied per sub-group rather than on the whole nest.
pub fn attendance_routes(app_state: AppState) -> Router<AppState> {
    let teacher = Router::new()
        .route("/sweep", post(post::run_sweep))
        .route("/records", get(get::list_records))
        .route("/records/export", get(get::export_records))
        .route_layer(from_fn_with_state(app_state.clone(), allow_teacher));

    let student = Router::new()
        .route("/submissions", post(post::submit_code))
        .route("/me/summary", get(get::my_summary))
        .route_layer(from_fn_with_state(app_state, allow_student));

    teacher.merge(student)
}
