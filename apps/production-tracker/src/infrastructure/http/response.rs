//! HTTP response DTOs.

use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::{Confirmed, FieldError};

/// Result of a write: what was stored plus the confirmation shown to the
/// user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse<T> {
    /// Whether the write happened.
    pub success: bool,
    /// Confirmation message.
    pub message: String,
    /// The stored record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field messages; empty on success.
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl<T> From<Confirmed<T>> for WriteResponse<T> {
    fn from(confirmed: Confirmed<T>) -> Self {
        Self {
            success: true,
            message: confirmed.message,
            data: Some(confirmed.value),
            errors: Vec::new(),
        }
    }
}

/// Write response with the status it is sent with.
pub type Written<T> = (StatusCode, Json<WriteResponse<T>>);

/// `201 Created` for a new record.
pub fn created<T>(confirmed: Confirmed<T>) -> Written<T> {
    (StatusCode::CREATED, Json(confirmed.into()))
}

/// `200 OK` for a change to an existing record.
pub fn updated<T>(confirmed: Confirmed<T>) -> Written<T> {
    (StatusCode::OK, Json(confirmed.into()))
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}
