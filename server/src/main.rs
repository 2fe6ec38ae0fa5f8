mod api;
mod auth;
mod config;
mod db;
mod error;
mod media;
mod models;
mod recipes;
mod schema;
mod store;
mod telemetry;

use crate::auth::TokenService;
use crate::config::Config;
use crate::media::{HostedMediaStore, MediaStore};
use crate::recipes::RecipeService;
use crate::store::{PgStore, RecipeStore};
use axum::extract::MatchedPath;
use axum::http::{header, HeaderValue, Method, Request};
use axum::middleware;
use axum::Router;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub tokens: Arc<TokenService>,
    pub recipes: RecipeService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        media: Arc<dyn MediaStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            recipes: RecipeService::new(store.clone(), media),
            store,
            tokens: Arc::new(tokens),
        }
    }
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match allowed_origin {
        None => layer.allow_origin(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
            Err(e) => {
                tracing::warn!(origin, error = %e, "ignoring malformed CORS_ALLOWED_ORIGIN, cross-origin requests will be refused");
                layer
            }
        },
    }
}

pub fn build_router(state: AppState, allowed_origin: Option<&str>) -> Router {
    // Public routes (no auth required)
    let public_router = api::public::router();

    // Protected routes (auth required)
    let protected_router = api::recipes::router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_auth,
    ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let router = Router::new()
        .merge(public_router)
        .merge(protected_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(cors_layer(allowed_origin));

    with_request_tracing(router)
}

/// One span per request; `/health` polls stay at trace level.
fn with_request_tracing(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or(request.uri().path());

                if matched_path == "/health" {
                    tracing::trace_span!("http_request")
                } else {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                }
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                    if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                        return;
                    }
                    let status = response.status().as_u16();
                    if status >= 500 {
                        tracing::error!(
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "request failed with server error"
                        );
                    } else {
                        tracing::info!(
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "request completed"
                        );
                    }
                },
            )
            .on_failure(
                |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                    tracing::error!(
                        error = %error,
                        latency_ms = %latency.as_millis(),
                        "request failed"
                    );
                },
            ),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        match api::openapi().to_pretty_json() {
            Ok(spec) => println!("{}", spec),
            Err(e) => {
                eprintln!("failed to render OpenAPI document: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is normal outside local development.
        if !e.not_found() {
            eprintln!("failed to read .env: {e}");
        }
    }

    let telemetry = telemetry::init_telemetry();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let pool = match db::create_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to prepare database");
            std::process::exit(1);
        }
    };

    let media = match HostedMediaStore::new(
        &config.media_host_url,
        &config.media_api_key,
        &config.media_api_secret,
    ) {
        Ok(media) => media,
        Err(e) => {
            tracing::error!(error = %e, "invalid media host settings");
            std::process::exit(1);
        }
    };

    let tokens = TokenService::new(
        &config.jwt_secret,
        config.token_ttl_minutes,
        config.admin_usernames.clone(),
    );
    let state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(media), tokens);
    let app = build_router(state, config.cors_allowed_origin.as_deref());

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(port = config.port, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on port {}", config.port);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    telemetry.shutdown();
}
