use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::error::DomainError;

/// HTTP-facing error with a stable `{code, message}` JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    /// One body for every credential mismatch.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("store unavailable")]
    StoreUnavailable,
    #[error("internal error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, code, message): (StatusCode, &str, String) = match &self {
            BadRequest(m) => (StatusCode::BAD_REQUEST, "bad_request", m.clone()),
            InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials".to_string(),
            ),
            NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.clone()),
            Conflict(m) => (StatusCode::CONFLICT, "conflict", m.clone()),
            UnprocessableEntity(m) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable_entity",
                m.clone(),
            ),
            StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                "store unavailable".to_string(),
            ),
            Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), code, "request failed");
        }

        let body = ErrorBody {
            code,
            message: &message,
        };
        (status, Json(body)).into_response()
    }
}

/// Map a domain error onto the HTTP surface.
///
/// Internals (store outages, hash failures) are logged where the error is
/// handled and rendered with a generic body; nothing about the credential
/// check's internal branch reaches the client.
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::InvalidCredentials => ApiError::InvalidCredentials,
        DomainError::UserNotFound { id } => {
            ApiError::NotFound(format!("User with id {} was not found", id))
        }
        DomainError::ItemNotFound { id } => {
            ApiError::NotFound(format!("Item with id {} was not found", id))
        }
        DomainError::UsernameTaken { username } => {
            ApiError::Conflict(format!("Username '{}' is already taken", username))
        }
        DomainError::EmailTaken { email } => {
            ApiError::Conflict(format!("Email '{}' is already in use", email))
        }
        DomainError::UserStillOwnsItems { id } => {
            ApiError::Conflict(format!("User {} still owns items", id))
        }
        DomainError::OwnerNotFound { owner_id } => {
            ApiError::UnprocessableEntity(format!("Owner {} does not exist", owner_id))
        }
        DomainError::Validation { .. } => ApiError::BadRequest(e.to_string()),
        DomainError::Unavailable { .. } => {
            tracing::error!(error = ?e, "Store unavailable");
            ApiError::StoreUnavailable
        }
        DomainError::Database { .. } | DomainError::Hashing { .. } => {
            tracing::error!(error = ?e, "Internal error occurred");
            ApiError::Internal
        }
    }
}
