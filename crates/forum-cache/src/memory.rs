//! In-process stand-ins for the Redis stores
//!
//! Entries carry their own deadline; expired entries are treated as absent
//! and dropped lazily on access.

use async_trait::async_trait;
use dashmap::DashMap;
use forum_core::traits::{OAuthStateStore, ProviderSessionStore, RepoResult};
use forum_core::{DomainError, PendingAuthorization, ProviderToken};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Expiring<V> {
    value: V,
    deadline: Instant,
}

impl<V> Expiring<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            deadline: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.deadline
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOAuthStateStore {
    entries: Arc<DashMap<String, Expiring<PendingAuthorization>>>,
}

impl InMemoryOAuthStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OAuthStateStore for InMemoryOAuthStateStore {
    async fn put(
        &self,
        nonce: &str,
        pending: &PendingAuthorization,
        ttl: Duration,
    ) -> RepoResult<()> {
        self.entries
            .insert(nonce.to_string(), Expiring::new(pending.clone(), ttl));
        Ok(())
    }

    async fn take(&self, nonce: &str) -> RepoResult<Option<PendingAuthorization>> {
        Ok(self
            .entries
            .remove(nonce)
            .map(|(_, entry)| entry)
            .filter(Expiring::is_live)
            .map(|entry| entry.value))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryProviderSessionStore {
    entries: Arc<DashMap<String, Expiring<ProviderToken>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryProviderSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every following call fail the way an unreachable Redis does
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderSessionStore for InMemoryProviderSessionStore {
    async fn save(&self, session_id: &str, token: &ProviderToken, ttl: Duration) -> RepoResult<()> {
        self.check_available()?;
        self.entries
            .insert(session_id.to_string(), Expiring::new(token.clone(), ttl));
        Ok(())
    }

    async fn load(&self, session_id: &str) -> RepoResult<Option<ProviderToken>> {
        self.check_available()?;
        let live = self
            .entries
            .get(session_id)
            .map(|entry| entry.is_live().then(|| entry.value.clone()));

        match live {
            Some(Some(token)) => Ok(Some(token)),
            Some(None) => {
                self.entries.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, session_id: &str) -> RepoResult<()> {
        self.check_available()?;
        self.entries.remove(session_id);
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::IdentityProvider;

    fn pending() -> PendingAuthorization {
        PendingAuthorization {
            provider: IdentityProvider::Google,
            created_at: 0,
        }
    }

    fn token() -> ProviderToken {
        ProviderToken {
            provider: IdentityProvider::Google,
            access_token: "ya29.token".to_string(),
            refresh_token: None,
            expires_at: None,
            scopes: vec!["openid".to_string()],
        }
    }

    #[tokio::test]
    async fn test_state_is_single_use() {
        let store = InMemoryOAuthStateStore::new();
        store
            .put("nonce", &pending(), Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(store.take("nonce").await.unwrap(), Some(pending()));
        assert_eq!(store.take("nonce").await.unwrap(), None);
        assert_eq!(store.take("other").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_expires() {
        let store = InMemoryOAuthStateStore::new();
        store
            .put("nonce", &pending(), Duration::from_secs(600))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(601)).await;
        assert_eq!(store.take("nonce").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_session_lifecycle() {
        let store = InMemoryProviderSessionStore::new();
        store
            .save("sid", &token(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.load("sid").await.unwrap(), Some(token()));
        assert_eq!(store.len(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.load("sid").await.unwrap(), None);
        assert!(store.is_empty());

        store
            .save("sid", &token(), Duration::from_secs(60))
            .await
            .unwrap();
        store.remove("sid").await.unwrap();
        assert_eq!(store.load("sid").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryProviderSessionStore::new();
        store.set_unavailable(true);

        let err = store.remove("sid").await.unwrap_err();
        assert!(matches!(err, DomainError::CacheError(_)));
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
