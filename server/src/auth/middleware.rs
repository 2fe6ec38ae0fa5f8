use crate::error::AppError;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Middleware that requires a valid bearer token for all requests.
/// On success the decoded [`super::Principal`] is attached to the request
/// extensions for [`super::AuthUser`] to pick up.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    match state.tokens.verify(&token) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn bearer_token(request: &Request<Body>) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AppError::InvalidToken)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(token.to_string())
}
