use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::{Model as Account, Role};
use util::state::AppState;

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Helper to extract, validate user from request extensions and insert them back into the request
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Loads the account for the authenticated user and checks its role.
///
/// The role lives in the database rather than the token because profiles are
/// completed after signup. DB errors deny access (fail-safe).
async fn load_account_with_role(
    state: &AppState,
    user_id: i64,
    role: Role,
) -> Result<Account, (StatusCode, Json<ApiResponse<Empty>>)> {
    let account = match Account::get_by_id(state.db(), user_id).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Account no longer exists")),
            ));
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id, "DB error while checking role; denying access");
            return Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Access denied")),
            ));
        }
    };

    if account.role != Some(role) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(format!("{role} access required"))),
        ));
    }
    if !account.profile_complete() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Complete your profile first")),
        ));
    }

    Ok(account)
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Teacher-only guard. Inserts the full account into request extensions so
/// handlers can read the teacher's class and subject without re-querying.
pub async fn allow_teacher(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut req, user) = extract_and_insert_authuser(req).await?;

    let account = load_account_with_role(&state, user.0.sub, Role::Teacher).await?;
    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

/// Student-only guard; same extension contract as `allow_teacher`.
pub async fn allow_student(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut req, user) = extract_and_insert_authuser(req).await?;

    let account = load_account_with_role(&state, user.0.sub, Role::Student).await?;
    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}
