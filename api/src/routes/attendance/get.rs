use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use db::models::{
    attendance_record::{Model as AttendanceRecord, Status},
    user::Model as Account,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use super::common::{AttendanceRecordResponse, month_name, month_names, percentage, render_csv};
use crate::auth::guards::Empty;
use crate::response::ApiResponse;

/// GET /api/attendance/records
///
/// The full ledger for the teacher's class/subject, newest day first, then
/// by roll number.
pub async fn list_records(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> (StatusCode, Json<ApiResponse<Vec<AttendanceRecordResponse>>>) {
    match AttendanceRecord::query(state.db(), &account.class_name, &account.subject).await {
        Ok(rows) => {
            let records: Vec<AttendanceRecordResponse> =
                rows.into_iter().map(AttendanceRecordResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(records, "Attendance records fetched")),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /api/attendance/records/export
///
/// The same ledger as a CSV attachment for download.
pub async fn export_records(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Response {
    match AttendanceRecord::query(state.db(), &account.class_name, &account.subject).await {
        Ok(rows) => {
            let csv = render_csv(&rows);
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        CONTENT_DISPOSITION,
                        "attachment; filename=\"attendance_report.csv\"",
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Empty>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    /// Calendar month name, e.g. "January".
    pub month: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct MonthSummary {
    pub month: String,
    pub total: usize,
    pub present: usize,
    pub percentage: f64,
}

#[derive(Debug, Serialize, Default)]
pub struct SummaryResponse {
    pub total: usize,
    pub present: usize,
    pub percentage: f64,
    /// Month names with at least one record, in calendar order.
    pub months: Vec<String>,
    pub month: Option<MonthSummary>,
}

/// GET /api/attendance/me/summary?month=January
///
/// Attendance analytics for the logged-in student: overall Present
/// percentage, plus a per-month breakdown when a month is selected.
pub async fn my_summary(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(params): Query<SummaryParams>,
) -> (StatusCode, Json<ApiResponse<SummaryResponse>>) {
    let rows = match AttendanceRecord::query_by_student(state.db(), &account.username).await {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let total = rows.len();
    let present = rows.iter().filter(|r| r.status == Status::Present).count();

    let month = params.month.map(|selected| {
        let in_month: Vec<_> = rows
            .iter()
            .filter(|r| month_name(r.date).eq_ignore_ascii_case(&selected))
            .collect();
        let month_total = in_month.len();
        let month_present = in_month
            .iter()
            .filter(|r| r.status == Status::Present)
            .count();
        MonthSummary {
            month: selected,
            total: month_total,
            present: month_present,
            percentage: percentage(month_present, month_total),
        }
    });

    let summary = SummaryResponse {
        total,
        present,
        percentage: percentage(present, total),
        months: month_names(&rows),
        month,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(summary, "Attendance summary fetched")),
    )
}
