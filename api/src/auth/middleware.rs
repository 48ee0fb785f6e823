use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::{Origin, UserAgent};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

use crate::auth::claims::AuthUser;

/// Request-log middleware: one line per request with method, path, client
/// IP, user id (0 when anonymous), origin, user-agent, response status and
/// latency. CORS preflight `OPTIONS` requests are passed through silently.
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let (mut parts, body) = req.into_parts();

    if parts.method == Method::OPTIONS {
        return Ok(next.run(Request::from_parts(parts, body)).await);
    }

    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let user_id = AuthUser::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map_or(0, |AuthUser(c)| c.sub);

    let origin = TypedHeader::<Origin>::from_request_parts(&mut parts, &())
        .await
        .map_or_else(|_| "unknown".into(), |TypedHeader(o)| o.to_string());

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &())
        .await
        .map_or_else(|_| "unknown".into(), |TypedHeader(ua)| ua.to_string());

    let started = Instant::now();
    let response = next.run(Request::from_parts(parts, body)).await;

    info!(
        %method,
        %path,
        ip = %addr.ip(),
        user = user_id,
        origin = %origin,
        user_agent = %user_agent,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    Ok(response)
}
