use super::get::parse_id;
use crate::api::{json_body, ErrorResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Recipe;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
    /// 1 to 5. Numeric strings such as `"4"` are accepted.
    #[serde(default)]
    #[schema(value_type = i64, minimum = 1, maximum = 5)]
    pub rating: Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeMessageResponse {
    pub message: String,
    pub recipe: Recipe,
}

/// Read the submitted rating. Anything that is not a whole number is out of range.
fn rating_value(raw: &Value) -> Result<i64, AppError> {
    let out_of_range = || AppError::validation("Rating must be between 1 and 5");
    match raw {
        Value::Number(n) => n.as_i64().ok_or_else(out_of_range),
        Value::String(s) => s.trim().parse().map_err(|_| out_of_range()),
        _ => Err(out_of_range()),
    }
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/comment",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Recipe number")
    ),
    request_body(content = CommentRequest, example = json!({"comment": "Great!", "rating": 5})),
    responses(
        (status = 200, description = "Comment added", body = RecipeMessageResponse),
        (status = 400, description = "Empty or long comment, or rating out of range", body = ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<RecipeMessageResponse>, AppError> {
    let id = parse_id(&id)?;
    let request = json_body(body)?;
    let rating = rating_value(&request.rating)?;

    let recipe = state
        .recipes
        .add_comment(id, &request.comment, rating, &user)?;

    Ok(Json(RecipeMessageResponse {
        message: "Comment added".to_string(),
        recipe,
    }))
}
