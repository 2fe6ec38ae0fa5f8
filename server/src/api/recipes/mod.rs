pub mod comment;
pub mod create;
pub mod delete;
pub mod delete_comment;
pub mod get;
pub mod list;
mod multipart;
pub mod update;

use crate::media::MAX_FILE_SIZE;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use utoipa::OpenApi;

/// Room for the multipart envelope and text fields around a full-size image.
const MAX_BODY_SIZE: usize = MAX_FILE_SIZE + 1024 * 1024;

/// Returns the router for recipe endpoints. Every route here needs a token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/recipes",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/recipes/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/recipes/{id}/comment", post(comment::add_comment))
        .route(
            "/recipes/{id}/comments/{index}",
            delete(delete_comment::delete_comment),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        comment::add_comment,
        delete_comment::delete_comment,
    ),
    components(schemas(
        create::RecipeFormRequest,
        comment::CommentRequest,
        comment::RecipeMessageResponse,
    ))
)]
pub struct ApiDoc;
