use super::Principal;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Extractor that provides the principal attached by [`super::require_auth`].
///
/// Use this in any handler mounted behind the auth middleware:
/// ```ignore
/// async fn my_handler(AuthUser(principal): AuthUser) -> impl IntoResponse {
///     // principal.username is the caller
/// }
/// ```
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::MissingToken)
    }
}
