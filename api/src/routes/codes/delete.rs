use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::{daily_code::Model as DailyCode, user::Model as Account};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::DateParam;

#[derive(Debug, Serialize, Default)]
pub struct RevokeResponse {
    pub removed: u64,
}

/// DELETE /api/codes?date=YYYY-MM-DD
///
/// Deletes all code rows for the teacher's class/subject on the given date
/// (default today). Until a new code is generated, submissions fail with
/// "no active code".
pub async fn revoke_code(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(params): Query<DateParam>,
) -> (StatusCode, Json<ApiResponse<RevokeResponse>>) {
    let date = params.resolve();

    match DailyCode::revoke(state.db(), &account.class_name, &account.subject, date).await {
        Ok(removed) => {
            let message = if removed > 0 {
                "Code has been deleted"
            } else {
                "No code to revoke"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(RevokeResponse { removed }, message)),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to revoke code: {e}"))),
        ),
    }
}
