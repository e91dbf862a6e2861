//! HTTP request extraction: the acting user, JSON bodies, path segments
//! and query strings. Every rejection answers with the error envelope.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::Actor;
use crate::domain::shared::CustomerId;
use crate::error::ApiError;

/// Header naming the signed-in user.
pub const ACTOR_HEADER: &str = "x-actor";

/// Header carrying the user's role; `admin` grants privileged actions.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(ApiError::unauthenticated)?;
        let privileged = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|role| role.trim().eq_ignore_ascii_case("admin"));
        Ok(Self::new(name, privileged))
    }
}

/// JSON body whose parse failures answer with the error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameters whose parse failures answer with the error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string whose parse failures answer with the error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Free-text search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Text to look for.
    #[serde(default)]
    pub q: String,
}

/// Measurement list and search filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementQuery {
    /// Restrict to one customer's measurements.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Text to look for.
    #[serde(default)]
    pub q: String,
}
