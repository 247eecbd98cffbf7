//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{info, warn};

use core_kernel::Actor;

use crate::auth::validate_token;
use crate::error::ApiError;
use crate::AppState;

const NOT_AUTHORIZED: &str = "Not authorized";

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn actor_from_token(state: &AppState, token: &str) -> Result<Actor, ApiError> {
    let claims = validate_token(token, &state.config.jwt_secret)?;
    Ok(claims.to_actor()?)
}

/// Authentication middleware
///
/// Validates the bearer token and adds the caller's [`Actor`] to the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        warn!(uri = %request.uri(), "Missing or invalid Authorization header");
        return ApiError::Unauthorized(NOT_AUTHORIZED.to_string()).into_response();
    };

    match actor_from_token(&state, token) {
        Ok(actor) => {
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        Err(e) => {
            warn!("Token validation failed: {:?}", e);
            ApiError::Unauthorized(NOT_AUTHORIZED.to_string()).into_response()
        }
    }
}

/// Adds the caller's [`Actor`] when a valid bearer token is present,
/// letting anonymous requests through unchanged
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let actor = bearer_token(&request).and_then(|token| actor_from_token(&state, token).ok());
    if let Some(actor) = actor {
        request.extensions_mut().insert(actor);
    }
    next.run(request).await
}

/// Request logging middleware
///
/// Records method, path, caller, status and duration of every request.
pub async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_id = request
        .extensions()
        .get::<Actor>()
        .map(|a| a.user_id.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user_id,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
