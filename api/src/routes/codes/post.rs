use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::{daily_code::Model as DailyCode, user::Model as Account};
use util::state::AppState;

use super::common::DailyCodeResponse;
use crate::response::ApiResponse;
use crate::routes::common::DateParam;

/// POST /api/codes
///
/// Generates a fresh 6-digit code for the teacher's class/subject and the
/// given date (default today). Any previously valid code for that key is
/// invalidated in the same operation.
pub async fn generate_code(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    body: Option<Json<DateParam>>,
) -> (StatusCode, Json<ApiResponse<DailyCodeResponse>>) {
    let date = body.map(|Json(b)| b).unwrap_or_default().resolve();

    match DailyCode::generate(
        state.db(),
        &account.class_name,
        &account.subject,
        date,
        &account.username,
    )
    .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                DailyCodeResponse::from(row),
                "New code generated",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to generate code: {e}"))),
        ),
    }
}
