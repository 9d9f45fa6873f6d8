//! Session container ports used by the OAuth federation flow

use async_trait::async_trait;
use std::time::Duration;

use crate::entities::{PendingAuthorization, ProviderToken};
use crate::traits::RepoResult;

/// Single-use storage for OAuth state nonces
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    async fn put(&self, nonce: &str, pending: &PendingAuthorization, ttl: Duration)
        -> RepoResult<()>;

    /// Remove and return the pending authorization. A second call for the
    /// same nonce returns `None`.
    async fn take(&self, nonce: &str) -> RepoResult<Option<PendingAuthorization>>;
}

/// Provider access tokens, keyed by the `oauth_session` cookie
#[async_trait]
pub trait ProviderSessionStore: Send + Sync {
    async fn save(&self, session_id: &str, token: &ProviderToken, ttl: Duration)
        -> RepoResult<()>;

    async fn load(&self, session_id: &str) -> RepoResult<Option<ProviderToken>>;

    async fn remove(&self, session_id: &str) -> RepoResult<()>;

    /// Check the backing store is reachable
    async fn ping(&self) -> RepoResult<()>;
}
