//! Doorman application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Build router with pages, auth actions, and static file serving
//! 4. Apply route gate and security headers middleware
//! 5. Start Axum server

use doorman::{
    auth::issuer::{RedisIssuer, SessionIssuer},
    auth::middleware::AppState,
    config::Config,
    middleware::{route_gate, security_headers},
    routes,
    storage::{user::RedisUserStore, UserStore},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting doorman on {}", config.bind_addr);

    // Connect to Redis and verify the connection up front
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");
    redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Build shared state: Redis-backed user store and session issuer
    let config = Arc::new(config);
    let users: Arc<dyn UserStore> = Arc::new(RedisUserStore::new(redis_client.clone()));
    let issuer: Arc<dyn SessionIssuer> = Arc::new(RedisIssuer::new(
        redis_client,
        users.clone(),
        config.session_ttl_secs,
    ));
    let state = AppState {
        users,
        issuer,
        config: config.clone(),
    };

    // Build router:
    // - Pages and auth actions
    // - Static assets under /static (exempt from the gate)
    // - Route gate, with security headers outermost so the gate's own
    //   redirects carry them too
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            route_gate,
        ))
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
