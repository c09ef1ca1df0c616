//! Extractors for the request-scoped identity and session.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::{CurrentUser, Session};

/// Requires an authenticated user; rejects with 401 when the middleware
/// chain did not establish one.
#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))
    }
}

/// The per-request session map. Falls back to an empty detached session when
/// the middleware did not run (tests exercising bare handlers).
#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().unwrap_or_default())
    }
}
