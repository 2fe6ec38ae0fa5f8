use super::comment::RecipeMessageResponse;
use super::get::parse_id;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    delete,
    path = "/recipes/{id}/comments/{index}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Recipe number"),
        ("index" = usize, Path, description = "Zero-based position in the comment list")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = RecipeMessageResponse),
        (status = 400, description = "Index out of range", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((id, index)): Path<(String, String)>,
) -> Result<Json<RecipeMessageResponse>, AppError> {
    let id = parse_id(&id)?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Invalid comment index"))?;

    let recipe = state.recipes.delete_comment(id, index, &user)?;

    tracing::info!(recipe_id = id, index, admin = %user.username, "deleted comment");
    Ok(Json(RecipeMessageResponse {
        message: "Comment deleted".to_string(),
        recipe,
    }))
}
