//! Test fixtures: configuration, a scripted identity provider and form bodies

use async_trait::async_trait;
use forum_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, OAuthConfig,
    RateLimitConfig, ReactionConfig, RedisConfig, ServerConfig, SessionConfig,
};
use forum_core::{FederatedProfile, IdentityProvider, ProviderToken};
use forum_service::{FederationError, ProviderClient};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub const TEST_PASSWORD: &str = "correct horse battery";

/// Code the fake provider refuses to exchange
pub const REJECTED_CODE: &str = "rejected";

/// Configuration for a server on the in-memory stores. The database and
/// Redis sections are never dialled.
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "forum-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout_secs: 1,
            run_migrations: false,
            migrations_dir: "./migrations".to_string(),
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
            max_connections: 1,
        },
        session: SessionConfig {
            ttl_hours: 24,
            cookie_secure: false,
        },
        oauth: OAuthConfig::default(),
        reactions: ReactionConfig {
            store_timeout_ms: 2000,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 10_000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

/// Unique username for a test account
pub fn unique_username() -> String {
    format!("user{}", unique_suffix())
}

/// `POST /register` body
pub fn register_form(username: &str) -> Vec<(&'static str, String)> {
    vec![
        ("username", username.to_string()),
        ("email", String::new()),
        ("password", TEST_PASSWORD.to_string()),
    ]
}

/// `POST /login` body
pub fn login_form(username: &str, password: &str) -> Vec<(&'static str, String)> {
    vec![
        ("username", username.to_string()),
        ("password", password.to_string()),
    ]
}

/// `POST /like-dislike` body
pub fn thread_form(thread_id: impl ToString, like_type: &str) -> Vec<(&'static str, String)> {
    vec![
        ("thread_id", thread_id.to_string()),
        ("like_type", like_type.to_string()),
    ]
}

/// `POST /comment-like-dislike` body
pub fn comment_form(
    comment_id: impl ToString,
    thread_id: impl ToString,
    like_type: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("comment_id", comment_id.to_string()),
        ("thread_id", thread_id.to_string()),
        ("like_type", like_type.to_string()),
    ]
}

/// GitHub stand-in: accepts every code except [`REJECTED_CODE`] and always
/// answers with the same profile
#[derive(Debug, Default)]
pub struct FakeGitHub;

#[async_trait]
impl ProviderClient for FakeGitHub {
    fn provider(&self) -> IdentityProvider {
        IdentityProvider::GitHub
    }

    fn authorize_url(&self, state: &str) -> String {
        format!("https://github.test/login/oauth/authorize?client_id=test&state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, FederationError> {
        if code == REJECTED_CODE {
            return Err(FederationError::Exchange("bad_verification_code".to_string()));
        }
        Ok(ProviderToken {
            provider: IdentityProvider::GitHub,
            access_token: format!("gho_{code}"),
            refresh_token: None,
            expires_at: None,
            scopes: vec!["read:user".to_string(), "user:email".to_string()],
        })
    }

    async fn fetch_profile(&self, _token: &ProviderToken) -> Result<FederatedProfile, FederationError> {
        Ok(FederatedProfile {
            provider: IdentityProvider::GitHub,
            subject: "583231".to_string(),
            login: "octocat".to_string(),
            email: None,
        })
    }
}
