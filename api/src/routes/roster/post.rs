use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::{
    roster_entry::{Model as RosterEntry, RosterRow},
    user::Model as Account,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct UploadRosterRequest {
    /// Rows parsed out of the uploaded sheet's "Roll No" / "Name" columns.
    pub rows: Vec<RosterRow>,
}

#[derive(Debug, Serialize, Default)]
pub struct UploadRosterResponse {
    pub inserted: u64,
}

/// POST /api/roster
///
/// Appends the uploaded rows to the roster for the teacher's class/subject.
/// Uploading the same sheet twice appends twice; the sweep tolerates the
/// duplicates because its existence check is keyed by roll number.
pub async fn upload_roster(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(req): Json<UploadRosterRequest>,
) -> (StatusCode, Json<ApiResponse<UploadRosterResponse>>) {
    if req.rows.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No roster rows supplied")),
        );
    }

    match RosterEntry::bulk_insert(
        state.db(),
        &account.class_name,
        &account.subject,
        &req.rows,
    )
    .await
    {
        Ok(inserted) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                UploadRosterResponse { inserted },
                "Student list uploaded",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to upload roster: {e}"))),
        ),
    }
}
