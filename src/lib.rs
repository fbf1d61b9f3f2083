use axum::{Router, http::HeaderName};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod accounts;
pub mod articles;
pub mod audit;
pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod password;
pub mod repository;
pub mod result;
pub mod token;
pub mod validate;

// Module for routing segregation (auth, article).
pub mod routes;
use routes::{article, auth};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use accounts::AccountService;
pub use articles::ArticleService;
pub use config::AppConfig;
pub use repository::{
    AccountRepositoryState, ArticleRepositoryState, PgAccountRepository, PgArticleRepository,
};
pub use token::TokenIssuer;

/// AppState
///
/// The single, thread-safe, immutable container holding the application's
/// services and configuration, shared across all incoming requests. The
/// services hold their repository handles internally; each request runs on
/// its own unit of work inside the store.
#[derive(Clone)]
pub struct AppState {
    /// Credential and token service (registration, login, deletion).
    pub accounts: AccountService,
    /// Article CRUD service with ownership checks.
    pub articles: ArticleService,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

/// create_router
///
/// Assembles the application's routing structure, applies global middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // CORS: the API is consumed by a browser frontend served elsewhere.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Unauthenticated liveness probe for monitoring.
        .route("/health", axum::routing::get(|| async { "ok" }))
        .merge(auth::auth_routes())
        .merge(article::article_routes())
        .with_state(state);

    // Observability and correlation layers, applied outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation: a unique id for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing: wraps the request/response lifecycle in a
                // span that carries the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation so every log line for a single
/// request is correlated by its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
