use super::multipart::read_recipe_form;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Recipe;
use crate::recipes::NewRecipe;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use utoipa::ToSchema;

/// Multipart fields accepted by create and update. Structured fields are JSON text.
#[derive(ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct RecipeFormRequest {
    pub name: String,
    pub cuisine: String,
    /// Minutes, a positive integer
    pub cooking_time: String,
    /// JSON array of `{name, quantity, unit}`
    pub ingredients: String,
    /// JSON array of strings, or a comma-separated list
    pub method_steps: String,
    pub nutritional_info: Option<String>,
    pub youtube_link: Option<String>,
    /// `.jpg` or `.png`, at most 5MB
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
    /// Update only: `true` drops the current image
    pub remove_image: Option<String>,
}

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = RecipeFormRequest),
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Invalid recipe", body = ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Storage or media host failure", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    let form = read_recipe_form(multipart).await?;
    let draft = NewRecipe::from_form(form)?;
    let recipe = state.recipes.create(draft, &user).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}
