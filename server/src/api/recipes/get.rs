use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Recipe;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// Recipe numbers start at 1.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::validation("Invalid recipe id"))
}

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe number")
    ),
    responses(
        (status = 200, description = "Recipe details", body = Recipe),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.recipes.get(id)?))
}
