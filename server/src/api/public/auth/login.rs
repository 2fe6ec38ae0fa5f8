use super::Credentials;
use crate::api::{json_body, ErrorResponse};
use crate::auth::{verify_password, TokenService};
use crate::error::AppError;
use crate::store::RecipeStore;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub username: String,
    /// Whether the token carries the admin claim.
    pub admin: bool,
}

/// Check credentials and issue a token. Unknown users and wrong passwords
/// produce the same error.
pub fn login_user(
    store: &dyn RecipeStore,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> Result<LoginResponse, AppError> {
    let user = store
        .find_user_by_username(username.trim())?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.issue(user.id, &user.username)?;

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        token,
        admin: tokens.is_admin(&user.username),
        username: user.username,
    })
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = Credentials, example = json!({"username": "alice_dev", "password": "password1"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let credentials = json_body(body)?;
    let response = login_user(
        state.store.as_ref(),
        &state.tokens,
        &credentials.username,
        &credentials.password,
    )?;
    Ok(Json(response))
}
