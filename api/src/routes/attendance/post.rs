use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use db::models::{
    attendance_record::{AttendanceError, Model as AttendanceRecord},
    user::Model as Account,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use super::common::AttendanceRecordResponse;
use crate::response::ApiResponse;
use crate::routes::common::{DateParam, format_validation_errors};

lazy_static::lazy_static! {
    static ref CODE_REGEX: regex::Regex = regex::Regex::new("^\\d{6}$").unwrap();
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitCodeRequest {
    #[validate(regex(path = *CODE_REGEX, message = "Code must be 6 digits"))]
    pub code: String,

    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Default)]
pub struct SubmissionResponse {
    pub status: Option<AttendanceRecordResponse>,
}

/// POST /api/attendance/submissions
///
/// A student submits the day's code to be marked Present for their own
/// class/subject.
///
/// - `201 Created` when the record is appended
/// - `404 Not Found` when no code is active for the day
/// - `422 Unprocessable Entity` when the code does not match
/// - `409 Conflict` when attendance is already recorded for the day
pub async fn submit_code(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(req): Json<SubmitCodeRequest>,
) -> (StatusCode, Json<ApiResponse<SubmissionResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let date = DateParam { date: req.date }.resolve();

    match AttendanceRecord::mark_present(state.db(), &account, date, &req.code).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SubmissionResponse {
                    status: Some(AttendanceRecordResponse::from(record)),
                },
                "Attendance marked as Present",
            )),
        ),
        Err(e @ AttendanceError::NoActiveCode) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(e @ AttendanceError::InvalidCode) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(e @ AttendanceError::AlreadyMarked) => {
            (StatusCode::CONFLICT, Json(ApiResponse::error(e.to_string())))
        }
        Err(AttendanceError::Db(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct SweepResponse {
    pub marked_absent: usize,
}

/// POST /api/attendance/sweep
///
/// Marks every roster member without a record for the date as Absent.
/// Idempotent; safe to trigger repeatedly. The timing is entirely the
/// teacher's call — there is no automatic end-of-day cutoff.
pub async fn run_sweep(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    body: Option<Json<DateParam>>,
) -> (StatusCode, Json<ApiResponse<SweepResponse>>) {
    let date = body.map(|Json(b)| b).unwrap_or_default().resolve();

    match AttendanceRecord::sweep_absent(state.db(), &account.class_name, &account.subject, date)
        .await
    {
        Ok(marked_absent) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SweepResponse { marked_absent },
                "Absent students marked",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to run sweep: {e}"))),
        ),
    }
}
