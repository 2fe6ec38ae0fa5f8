use super::get::parse_id;
use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe number")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 403, description = "Neither creator nor admin", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    state.recipes.delete(id, &user).await?;
    Ok(MessageResponse::new("Recipe deleted successfully"))
}
