//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use forum_cache::{RedisOAuthStateStore, RedisPool, RedisProviderSessionStore};
use forum_common::{AppConfig, AppError, SessionCodec, SigningKey};
use forum_db::{create_pool, run_migrations, PgReactionStore, PgUserRepository};
use forum_service::{HttpProviderClient, ServiceContext, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware.
///
/// Health routes sit outside the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let router = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(router.merge(health_routes()).with_state(state))
}

/// Connect the backing stores and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&forum_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if config.database.run_migrations {
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }
    info!("PostgreSQL connection established");

    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;

    // Sessions do not survive a restart
    let signing_key = SigningKey::generate();

    let mut builder = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .reaction_store(Arc::new(PgReactionStore::new(pool)))
        .oauth_states(Arc::new(RedisOAuthStateStore::new(redis_pool.clone())))
        .provider_sessions(Arc::new(RedisProviderSessionStore::new(redis_pool)))
        .session_codec(SessionCodec::new(&signing_key, config.session.ttl()))
        .store_timeout(config.reactions.store_timeout())
        .oauth_state_ttl(config.oauth.state_ttl())
        .provider_session_ttl(config.session.ttl().to_std().unwrap_or_default());

    for (provider, provider_config) in config.oauth.enabled() {
        let client = HttpProviderClient::new(provider, provider_config)
            .map_err(|e| AppError::Config(format!("{provider}: {e}")))?;
        info!(%provider, "Federated login enabled");
        builder = builder.provider(Arc::new(client));
    }

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(create_app_state_with(service_context, config))
}

/// AppState over an already wired context, e.g. the in-memory stores
pub fn create_app_state_with(service_context: ServiceContext, config: AppConfig) -> AppState {
    AppState::new(service_context, config)
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}
