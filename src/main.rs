use nblog::{
    AppState,
    accounts::AccountService,
    articles::ArticleService,
    config::{AppConfig, Env},
    create_router,
    repository::{
        AccountRepository, AccountRepositoryState, ArticleRepositoryState, PgAccountRepository,
        PgArticleRepository,
    },
    token::TokenIssuer,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point: configuration, logging, database, role
/// seeding, and the HTTP server, in that order.
#[tokio::main]
async fn main() {
    // Configuration & environment loading (fail-fast).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // Log filter: RUST_LOG wins, with sensible local defaults otherwise.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nblog=debug,tower_http=info,axum=trace".into());

    // Structured logging format selected by environment: pretty for humans
    // locally, JSON for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // Database initialization (Postgres).
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let account_repo =
        Arc::new(PgAccountRepository::new(pool.clone())) as AccountRepositoryState;
    let article_repo = Arc::new(PgArticleRepository::new(pool)) as ArticleRepositoryState;

    // Seed the fixed role rows once; idempotent, immutable afterwards.
    account_repo
        .seed_roles()
        .await
        .expect("FATAL: Failed to seed roles.");

    // Service assembly. The token issuer captures the immutable signing
    // configuration for the process lifetime.
    let tokens = TokenIssuer::new(config.jwt.clone());
    let app_state = AppState {
        accounts: AccountService::new(account_repo, tokens),
        articles: ArticleService::new(article_repo),
        config,
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:3000");

    axum::serve(listener, app).await.unwrap();
}
