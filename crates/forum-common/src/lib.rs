//! # forum-common
//!
//! Shared utilities including configuration, error handling, session tokens,
//! password hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    check_credentials, hash_password, validate_password, validate_username, verify_password,
    SessionClaims, SessionCodec, SessionToken, SigningKey, TokenError, DEFAULT_SESSION_TTL_HOURS,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, OAuthConfig,
    OAuthProviderConfig, RateLimitConfig, ReactionConfig, RedisConfig, ServerConfig,
    SessionConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
