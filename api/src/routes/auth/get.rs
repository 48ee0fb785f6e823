use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::user::Model as Account;
use util::state::AppState;

use super::common::AccountResponse;
use crate::auth::AuthUser;
use crate::response::ApiResponse;

/// GET /api/auth/me
///
/// Returns the authenticated account, token-free.
pub async fn me(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<AccountResponse>>) {
    match Account::get_by_id(state.db(), claims.sub).await {
        Ok(Some(account)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AccountResponse::from(account),
                "Account fetched",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Account no longer exists")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
