use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::user::{Model as Account, Role};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::common::AccountResponse;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub name: String,

    pub role: Role,

    #[validate(length(min = 1, message = "Class / semester is required"))]
    pub class_name: String,

    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,

    /// Required for students, ignored for teachers.
    #[serde(default)]
    pub roll_no: String,
}

/// PUT /api/auth/profile
///
/// Completes (or edits) the authenticated account's profile. This is where
/// an account becomes a Teacher or a Student; until then no role-guarded
/// route is accessible.
///
/// - `200 OK` with the updated account
/// - `400 Bad Request` on validation failure or a student without a roll number
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<ProfileRequest>,
) -> (StatusCode, Json<ApiResponse<AccountResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    // The roll number only exists for students; teachers get it blanked.
    let roll_no = match req.role {
        Role::Student if req.roll_no.trim().is_empty() => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Roll number is required for students")),
            );
        }
        Role::Student => req.roll_no.as_str(),
        Role::Teacher => "",
    };

    match Account::update_profile(
        state.db(),
        claims.sub,
        &req.name,
        req.role,
        &req.class_name,
        &req.subject,
        roll_no,
    )
    .await
    {
        Ok(account) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AccountResponse::from(account),
                "Profile saved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
