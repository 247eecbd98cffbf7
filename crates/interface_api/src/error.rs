//! API error handling

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_claims::ClaimError;
use domain_items::ItemError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        field: Option<String>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            field: None,
        }
    }

    pub fn bad_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Maps a storage failure that reached the API
    fn from_port(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{} {} not found", entity_type, id))
            }
            PortError::Validation { message, field } => ApiError::BadRequest { message, field },
            PortError::Conflict { message } => ApiError::Conflict(message),
            other => {
                error!(error = %other, "Storage failure");
                ApiError::Internal("The operation could not be completed. Please try again.".to_string())
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, field) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest { message, field } => {
                (StatusCode::BAD_REQUEST, "validation_error", message, field)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg, None)
            }
        };

        let body = ErrorResponse {
            message,
            error: error_type.to_string(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => ApiError::NotFound("Item not found".to_string()),
            ItemError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ItemError::Validation { field, message } => ApiError::BadRequest { message, field },
            e @ ItemError::InvalidStatusTransition { .. } => ApiError::Conflict(e.to_string()),
            e @ ItemError::QuestionsLocked => ApiError::Conflict(e.to_string()),
            ItemError::Storage(port) => ApiError::from_port(port),
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::ClaimNotFound(_) => ApiError::NotFound("Claim not found".to_string()),
            ClaimError::ItemNotFound(_) => ApiError::NotFound("Item not found".to_string()),
            ClaimError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ClaimError::Validation { field, message } => ApiError::BadRequest { message, field },
            e @ ClaimError::IncorrectAnswers => ApiError::bad_field("answers", e.to_string()),
            e @ (ClaimError::InvalidStatusTransition { .. }
            | ClaimError::ItemNotClaimable { .. }
            | ClaimError::DuplicateClaim) => ApiError::Conflict(e.to_string()),
            ClaimError::Item(item) => item.into(),
            ClaimError::Storage(port) => ApiError::from_port(port),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
