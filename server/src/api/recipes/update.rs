use super::get::parse_id;
use super::multipart::read_recipe_form;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Recipe;
use crate::recipes::RecipePatch;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};

#[utoipa::path(
    put,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe number")
    ),
    request_body(content_type = "multipart/form-data", content = super::create::RecipeFormRequest),
    responses(
        (status = 200, description = "Updated recipe", body = Recipe),
        (status = 400, description = "Invalid change", body = ErrorResponse),
        (status = 403, description = "Not the recipe's creator", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Recipe>, AppError> {
    let id = parse_id(&id)?;
    let form = read_recipe_form(multipart).await?;
    let patch = RecipePatch::from_form(form)?;
    Ok(Json(state.recipes.update(id, patch, &user).await?))
}
