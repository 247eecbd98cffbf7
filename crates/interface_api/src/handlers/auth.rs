//! Login handler

use axum::{extract::State, Json};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{create_token, AuthError};
use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::AppState;

/// Issues a token for a user of the demo directory
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if !state.config.allow_demo_login {
        return Err(ApiError::NotFound("Login is disabled".to_string()));
    }
    if request.validate().is_err() {
        return Err(ApiError::bad_field("email", "A valid email address is required"));
    }

    let Some(user) = state.users.find_by_email(&request.email) else {
        warn!(email = %request.email, "Login with unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let token = create_token(user, &state.config.jwt_secret, state.config.jwt_expiration_secs)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.clone(),
    }))
}
