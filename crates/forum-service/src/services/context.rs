//! Service context - dependency container for services
//!
//! Holds the storage ports, the session codec and the configured identity
//! providers. Everything is behind `Arc`, so cloning is cheap.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use forum_common::SessionCodec;
use forum_core::traits::{
    OAuthStateStore, ProviderSessionStore, ReactionStore, RepoResult, UserRepository,
};
use forum_core::{DomainError, IdentityProvider};

use crate::federation::ProviderClient;

use super::error::{ServiceError, ServiceResult};

/// Default bound on one reaction engine store operation
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default lifetime of an OAuth state nonce
pub const DEFAULT_OAUTH_STATE_TTL: Duration = Duration::from_secs(600);

/// Default lifetime of a stored provider token
pub const DEFAULT_PROVIDER_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - the credential store and the reaction store
/// - the OAuth state and provider session containers
/// - the session token codec
/// - the enabled identity provider clients
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    reaction_store: Arc<dyn ReactionStore>,

    oauth_states: Arc<dyn OAuthStateStore>,
    provider_sessions: Arc<dyn ProviderSessionStore>,

    session_codec: Arc<SessionCodec>,
    providers: Arc<HashMap<IdentityProvider, Arc<dyn ProviderClient>>>,

    store_timeout: Duration,
    oauth_state_ttl: Duration,
    provider_session_ttl: Duration,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Storage ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the reaction store
    pub fn reaction_store(&self) -> &dyn ReactionStore {
        self.reaction_store.as_ref()
    }

    // === Session containers ===

    pub fn oauth_states(&self) -> &dyn OAuthStateStore {
        self.oauth_states.as_ref()
    }

    pub fn provider_sessions(&self) -> &dyn ProviderSessionStore {
        self.provider_sessions.as_ref()
    }

    // === Auth ===

    /// Get the session token codec
    pub fn session_codec(&self) -> &SessionCodec {
        self.session_codec.as_ref()
    }

    /// Client for a provider, `None` when the provider is not configured
    pub fn provider(&self, provider: IdentityProvider) -> Option<&dyn ProviderClient> {
        self.providers.get(&provider).map(|client| client.as_ref())
    }

    /// Configured providers, in declaration order
    pub fn enabled_providers(&self) -> Vec<IdentityProvider> {
        IdentityProvider::ALL
            .into_iter()
            .filter(|p| self.providers.contains_key(p))
            .collect()
    }

    // === Settings ===

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    pub fn oauth_state_ttl(&self) -> Duration {
        self.oauth_state_ttl
    }

    pub fn provider_session_ttl(&self) -> Duration {
        self.provider_session_ttl
    }

    /// Run store `work` under the store timeout. An expired deadline drops
    /// the future, which drops any open transaction and rolls it back.
    pub(crate) async fn bounded<T>(
        &self,
        work: impl Future<Output = RepoResult<T>>,
    ) -> ServiceResult<T> {
        match tokio::time::timeout(self.store_timeout, work).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => {
                let ms = u64::try_from(self.store_timeout.as_millis()).unwrap_or(u64::MAX);
                Err(DomainError::StoreTimeout(ms).into())
            }
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("stores", &"...")
            .field("providers", &self.enabled_providers())
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    reaction_store: Option<Arc<dyn ReactionStore>>,
    oauth_states: Option<Arc<dyn OAuthStateStore>>,
    provider_sessions: Option<Arc<dyn ProviderSessionStore>>,
    session_codec: Option<Arc<SessionCodec>>,
    providers: HashMap<IdentityProvider, Arc<dyn ProviderClient>>,
    store_timeout: Duration,
    oauth_state_ttl: Duration,
    provider_session_ttl: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            reaction_store: None,
            oauth_states: None,
            provider_sessions: None,
            session_codec: None,
            providers: HashMap::new(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            oauth_state_ttl: DEFAULT_OAUTH_STATE_TTL,
            provider_session_ttl: DEFAULT_PROVIDER_SESSION_TTL,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn reaction_store(mut self, store: Arc<dyn ReactionStore>) -> Self {
        self.reaction_store = Some(store);
        self
    }

    pub fn oauth_states(mut self, store: Arc<dyn OAuthStateStore>) -> Self {
        self.oauth_states = Some(store);
        self
    }

    pub fn provider_sessions(mut self, store: Arc<dyn ProviderSessionStore>) -> Self {
        self.provider_sessions = Some(store);
        self
    }

    pub fn session_codec(mut self, codec: SessionCodec) -> Self {
        self.session_codec = Some(Arc::new(codec));
        self
    }

    /// Register a provider client. A later client for the same provider
    /// replaces the earlier one.
    pub fn provider(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.providers.insert(client.provider(), client);
        self
    }

    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn oauth_state_ttl(mut self, ttl: Duration) -> Self {
        self.oauth_state_ttl = ttl;
        self
    }

    pub fn provider_session_ttl(mut self, ttl: Duration) -> Self {
        self.provider_session_ttl = ttl;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let required = |name: &str| ServiceError::validation(format!("{name} is required"));

        Ok(ServiceContext {
            user_repo: self.user_repo.ok_or_else(|| required("user_repo"))?,
            reaction_store: self.reaction_store.ok_or_else(|| required("reaction_store"))?,
            oauth_states: self.oauth_states.ok_or_else(|| required("oauth_states"))?,
            provider_sessions: self
                .provider_sessions
                .ok_or_else(|| required("provider_sessions"))?,
            session_codec: self.session_codec.ok_or_else(|| required("session_codec"))?,
            providers: Arc::new(self.providers),
            store_timeout: self.store_timeout,
            oauth_state_ttl: self.oauth_state_ttl,
            provider_session_ttl: self.provider_session_ttl,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
