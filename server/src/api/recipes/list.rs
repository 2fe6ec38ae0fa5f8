use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Recipe;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Case-insensitive match against recipe name or cuisine
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes ordered by id", body = Vec<Recipe>),
        (status = 403, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    Ok(Json(state.recipes.list(search)?))
}
