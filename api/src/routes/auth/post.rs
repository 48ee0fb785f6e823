use axum::{Json, extract::State, http::StatusCode};
use db::models::user::Model as Account;
use sea_orm::SqlErr;
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::common::AccountResponse;
use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

lazy_static::lazy_static! {
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new("^[A-Za-z0-9_.-]{3,32}$").unwrap();
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be 3-32 characters (letters, digits, . _ -)"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// POST /api/auth/register
///
/// Creates an account with blank profile fields and returns a token. The
/// profile (name, role, class, subject, roll number) is completed afterwards
/// via `PUT /api/auth/profile`.
///
/// - `201 Created` with the account and token
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username is already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> (StatusCode, Json<ApiResponse<AccountResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    match Account::create(state.db(), &req.username, &req.email, &req.password).await {
        Ok(account) => {
            let (token, expires_at) = generate_jwt(account.id);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    AccountResponse::from(account).with_token(token, expires_at),
                    "Signup successful",
                )),
            )
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Username already taken")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/auth/login
///
/// Verifies credentials and issues a JWT. `profile_complete` in the payload
/// tells the client whether to route to profile setup or to the dashboard.
///
/// - `200 OK` with the account and token
/// - `401 Unauthorized` on a bad username or password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<AccountResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    match Account::verify_credentials(state.db(), &req.username, &req.password).await {
        Ok(Some(account)) => {
            let (token, expires_at) = generate_jwt(account.id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    AccountResponse::from(account).with_token(token, expires_at),
                    "Login successful",
                )),
            )
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid username or password")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_validation() {
        let ok = RegisterRequest {
            username: "amit01".into(),
            email: "amit@example.com".into(),
            password: "strongpassword".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_username = RegisterRequest {
            username: "a!".into(),
            email: "amit@example.com".into(),
            password: "strongpassword".into(),
        };
        assert!(bad_username.validate().is_err());

        let bad_email = RegisterRequest {
            username: "amit01".into(),
            email: "not-an-email".into(),
            password: "strongpassword".into(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            username: "amit01".into(),
            email: "amit@example.com".into(),
            password: "short".into(),
        };
        assert!(short_password.validate().is_err());
    }
}
