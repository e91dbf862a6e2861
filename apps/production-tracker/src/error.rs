//! HTTP error mapping for the production tracker.
//!
//! Every failed request answers with the same envelope a write uses, with
//! `success: false`, a stable error code and any field messages.
//!
//! # HTTP Status Codes
//!
//! | Code | Name | Usage |
//! |------|------|-------|
//! | 400 | Bad Request | Body or query could not be parsed |
//! | 401 | Unauthorized | No actor on the request |
//! | 403 | Forbidden | Actor lacks admin rights |
//! | 404 | Not Found | Referenced record does not exist |
//! | 409 | Conflict | Uniqueness rule refused the write |
//! | 422 | Unprocessable Entity | Field validation failed |
//! | 500 | Internal Server Error | Store failure |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::{FieldError, TrackerError};
use crate::domain::shared::Conflict;

/// Error codes returned to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body or query could not be parsed.
    InvalidRequest,
    /// The request carried no actor.
    Unauthenticated,
    /// The actor may not perform the action.
    Forbidden,
    /// A referenced record does not exist.
    NotFound,
    /// A uniqueness rule refused the write.
    Conflict,
    /// One or more fields failed validation.
    ValidationFailed,
    /// The store failed.
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error ready to be written as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    errors: Vec<FieldError>,
    conflict: Option<Conflict>,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
            conflict: None,
        }
    }

    /// Attach field messages.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the field messages.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Malformed body or query.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Missing actor.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(
            ErrorCode::Unauthenticated,
            "Sign in to use the production tracker.",
        )
    }

    /// Convert to the response body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            success: false,
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            errors: self.errors.clone(),
            conflict: self.conflict,
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(errors) => {
                let message = match errors.as_slice() {
                    [only] if only.field.is_none() => only.message.clone(),
                    _ => "Please correct the errors below.".to_string(),
                };
                Self::new(ErrorCode::ValidationFailed, message).with_errors(errors)
            }
            TrackerError::Conflict(conflict) => Self {
                conflict: Some(conflict),
                ..Self::new(ErrorCode::Conflict, conflict.to_string())
            },
            err @ TrackerError::NotFound { .. } => Self::new(ErrorCode::NotFound, err.to_string()),
            TrackerError::Forbidden { action } => Self::new(
                ErrorCode::Forbidden,
                format!("Only an admin can {action}."),
            ),
            TrackerError::Storage { message } => {
                tracing::error!(error = %message, "Store failure while handling request");
                Self::new(ErrorCode::InternalError, "Something went wrong. Please try again.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self.to_http_response())).into_response()
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Always false.
    pub success: bool,
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field messages.
    #[serde(default)]
    pub errors: Vec<FieldError>,
    /// The uniqueness rule that refused the write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<Conflict>,
}
