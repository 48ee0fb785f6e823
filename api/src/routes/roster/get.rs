use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::{roster_entry::Model as RosterEntry, user::Model as Account};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct RosterEntryResponse {
    pub roll_no: String,
    pub name: String,
}

/// GET /api/roster
///
/// The roster for the teacher's class/subject, ordered by roll number.
pub async fn list_roster(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> (StatusCode, Json<ApiResponse<Vec<RosterEntryResponse>>>) {
    match RosterEntry::list(state.db(), &account.class_name, &account.subject).await {
        Ok(rows) => {
            let entries = rows
                .into_iter()
                .map(|row| RosterEntryResponse {
                    roll_no: row.roll_no,
                    name: row.name,
                })
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(entries, "Roster fetched")),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
