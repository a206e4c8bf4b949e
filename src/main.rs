//! LoveRituals API - Main Application Entry Point
//!
//! This is the REST API server behind the LoveRituals web application. It
//! stores shareable configurations for the romance-themed interactive tools
//! (text-card generators, starry-sky canvases, countdown capsules) and
//! serves the tool/category catalog.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Bearer tokens with SHA-256 hashing (writes only)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use db::DbPool;
use services::share_id::RandomIds;
use tower_http::trace::TraceLayer;

/// Shared application state handed to every handler.
///
/// The pool is reference counted, the id source is a couple of
/// configuration values; cloning per request is cheap. Both are built
/// once at startup and injected, there are no lazily-initialized process
/// globals.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: DbPool,

    /// Identifier source for share links and record ids
    pub ids: RandomIds,

    /// Insert attempts before a save gives up on share-id collisions
    pub save_attempts: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let state = AppState {
        pool,
        ids: RandomIds::new(config.share_id_length),
        save_attempts: config.save_attempts,
    };

    // Write endpoints require a bearer token (saving configs, curating
    // categories)
    let authenticated_routes = Router::new()
        .route("/api/v1/configs", post(handlers::tools::save_config))
        .route(
            "/api/v1/categories",
            post(handlers::categories::create_category),
        )
        .route(
            "/api/v1/categories/{id_or_name}",
            put(handlers::categories::update_category),
        )
        .route(
            "/api/v1/categories/{id_or_name}",
            delete(handlers::categories::delete_category),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Read endpoints are public; for shared configurations the share id
    // itself is the capability token
    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/shares/{share_id}",
            get(handlers::tools::get_shared_config),
        )
        .route("/api/v1/tools", get(handlers::tools::list_tools))
        .route(
            "/api/v1/tools/{tool_key}/meta",
            get(handlers::tools::get_tool_meta),
        )
        .route(
            "/api/v1/categories",
            get(handlers::categories::list_categories),
        )
        .route(
            "/api/v1/categories/{id_or_name}",
            get(handlers::categories::get_category),
        )
        .route(
            "/api/v1/categories/{id_or_name}/tools",
            get(handlers::categories::list_category_tools),
        )
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
