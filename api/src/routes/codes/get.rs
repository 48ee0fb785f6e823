use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::{daily_code::Model as DailyCode, user::Model as Account};
use util::state::AppState;

use super::common::DailyCodeResponse;
use crate::response::ApiResponse;
use crate::routes::common::DateParam;

/// GET /api/codes/active?date=YYYY-MM-DD
///
/// Returns the active code for the teacher's class/subject on the given
/// date (default today), or `null` when none exists.
pub async fn active_code(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(params): Query<DateParam>,
) -> (StatusCode, Json<ApiResponse<Option<DailyCodeResponse>>>) {
    let date = params.resolve();

    match DailyCode::lookup_active(state.db(), &account.class_name, &account.subject, date).await {
        Ok(Some(row)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(DailyCodeResponse::from(row)),
                "Active code fetched",
            )),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(ApiResponse::success(None, "No active code yet")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to fetch code: {e}"))),
        ),
    }
}
