pub mod auth;
pub mod health;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health))
        .route("/register", post(auth::register::register))
        .route("/login", post(auth::login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::welcome,
        health::health,
        auth::register::register,
        auth::login::login,
    ),
    components(schemas(
        health::HealthResponse,
        auth::Credentials,
        auth::login::LoginResponse,
    ))
)]
pub struct ApiDoc;
