//! Authentication DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::User;

/// Body of `POST /auth/login`
///
/// The demo directory has no passwords, so `password` is accepted and
/// ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
