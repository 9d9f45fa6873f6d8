//! OAuth state nonces in Redis.
//!
//! Each authorization redirect stores its nonce under `oauth_state:<nonce>`
//! with a short TTL; the callback consumes it with `GETDEL`, so a nonce can
//! be used at most once.

use async_trait::async_trait;
use forum_core::traits::{OAuthStateStore, RepoResult};
use forum_core::PendingAuthorization;
use std::time::Duration;
use tracing::instrument;

use crate::pool::RedisPool;

/// Key prefix for OAuth state nonces
const OAUTH_STATE_PREFIX: &str = "oauth_state:";

#[derive(Clone, Debug)]
pub struct RedisOAuthStateStore {
    pool: RedisPool,
}

impl RedisOAuthStateStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(nonce: &str) -> String {
        format!("{OAUTH_STATE_PREFIX}{nonce}")
    }
}

#[async_trait]
impl OAuthStateStore for RedisOAuthStateStore {
    #[instrument(skip(self, nonce, pending), fields(provider = %pending.provider))]
    async fn put(
        &self,
        nonce: &str,
        pending: &PendingAuthorization,
        ttl: Duration,
    ) -> RepoResult<()> {
        self.pool.set(&Self::key(nonce), pending, ttl).await?;
        Ok(())
    }

    #[instrument(skip(self, nonce))]
    async fn take(&self, nonce: &str) -> RepoResult<Option<PendingAuthorization>> {
        Ok(self.pool.take(&Self::key(nonce)).await?)
    }
}
