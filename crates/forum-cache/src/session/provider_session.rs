//! Provider access tokens in Redis, keyed by the `oauth_session` cookie id

use async_trait::async_trait;
use forum_core::traits::{ProviderSessionStore, RepoResult};
use forum_core::ProviderToken;
use std::time::Duration;
use tracing::instrument;

use crate::pool::RedisPool;

/// Key prefix for provider sessions
const PROVIDER_SESSION_PREFIX: &str = "provider_session:";

#[derive(Clone, Debug)]
pub struct RedisProviderSessionStore {
    pool: RedisPool,
}

impl RedisProviderSessionStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(session_id: &str) -> String {
        format!("{PROVIDER_SESSION_PREFIX}{session_id}")
    }
}

#[async_trait]
impl ProviderSessionStore for RedisProviderSessionStore {
    #[instrument(skip(self, token), fields(provider = %token.provider))]
    async fn save(&self, session_id: &str, token: &ProviderToken, ttl: Duration) -> RepoResult<()> {
        self.pool.set(&Self::key(session_id), token, ttl).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load(&self, session_id: &str) -> RepoResult<Option<ProviderToken>> {
        Ok(self.pool.get_value(&Self::key(session_id)).await?)
    }

    #[instrument(skip(self))]
    async fn remove(&self, session_id: &str) -> RepoResult<()> {
        self.pool.delete(&Self::key(session_id)).await?;
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(self.pool.health_check().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(
            RedisProviderSessionStore::key("3f2b"),
            "provider_session:3f2b"
        );
    }
}
