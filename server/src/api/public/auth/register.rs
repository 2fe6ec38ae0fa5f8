use super::Credentials;
use crate::api::{json_body, ErrorResponse, MessageResponse};
use crate::auth::hash_password;
use crate::error::AppError;
use crate::models::User;
use crate::recipes::form::within_column;
use crate::store::{RecipeStore, StoreError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub fn register_user(
    store: &dyn RecipeStore,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation("Username and password are required"));
    }
    let username = within_column(username.to_string(), "Username")?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))?;

    match store.create_user(&username, &password_hash) {
        Ok(user) => Ok(user),
        Err(StoreError::DuplicateUsername) => {
            Err(AppError::validation("Username already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body(content = Credentials, example = json!({"username": "alice_dev", "password": "password1"})),
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Missing fields or username taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let credentials = json_body(body)?;
    let user = register_user(
        state.store.as_ref(),
        &credentials.username,
        &credentials.password,
    )?;

    tracing::info!(user_id = %user.id, username = %user.username, "registered user");
    Ok((
        StatusCode::CREATED,
        MessageResponse::new("User registered successfully"),
    ))
}
