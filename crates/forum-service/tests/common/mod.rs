//! Shared fixtures: services wired to the in-memory stores and a scripted
//! identity provider.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use forum_cache::{InMemoryOAuthStateStore, InMemoryProviderSessionStore};
use forum_common::{SessionCodec, SigningKey};
use forum_core::{FederatedProfile, Identity, IdentityProvider, ProviderToken};
use forum_db::InMemoryForumStore;
use forum_service::dto::{LoginRequest, RegisterRequest};
use forum_service::{
    AuthService, FederationError, IdentityResolver, ProviderClient, ServiceContext,
    ServiceContextBuilder,
};

pub const SIGNING_KEY: [u8; 32] = [42u8; 32];

/// Code the fake provider refuses to exchange
pub const REJECTED_CODE: &str = "rejected";

/// Code that exchanges fine but whose token has no readable profile
pub const NO_PROFILE_CODE: &str = "no-profile";

pub struct Harness {
    pub ctx: ServiceContext,
    pub store: InMemoryForumStore,
    pub states: InMemoryOAuthStateStore,
    pub sessions: InMemoryProviderSessionStore,
}

pub fn harness() -> Harness {
    harness_with(|builder| builder)
}

pub fn harness_with(configure: impl FnOnce(ServiceContextBuilder) -> ServiceContextBuilder) -> Harness {
    let store = InMemoryForumStore::new();
    let states = InMemoryOAuthStateStore::new();
    let sessions = InMemoryProviderSessionStore::new();

    let builder = ServiceContext::builder()
        .user_repo(Arc::new(store.clone()))
        .reaction_store(Arc::new(store.clone()))
        .oauth_states(Arc::new(states.clone()))
        .provider_sessions(Arc::new(sessions.clone()))
        .session_codec(codec())
        .provider(Arc::new(FakeProvider::github()));

    let ctx = configure(builder).build().expect("context");

    Harness {
        ctx,
        store,
        states,
        sessions,
    }
}

pub fn codec() -> SessionCodec {
    SessionCodec::with_default_ttl(&SigningKey::from_bytes(SIGNING_KEY))
}

/// Register a local account, log in and resolve the resulting cookie
pub async fn sign_up(ctx: &ServiceContext, username: &str) -> Identity {
    let auth = AuthService::new(ctx);
    auth.register(RegisterRequest {
        username: username.to_string(),
        email: None,
        password: "correct horse battery".to_string(),
    })
    .await
    .expect("register");

    let session = auth
        .login(LoginRequest {
            username: username.to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect("login");

    IdentityResolver::new(ctx)
        .resolve_from_cookie(Some(&session.token))
        .await
        .expect("resolve")
}

/// Pull the state nonce out of an authorization URL
pub fn state_of(url: &str) -> String {
    url.split("state=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .expect("state parameter")
        .to_string()
}

/// Provider that accepts every code except [`REJECTED_CODE`] and
/// [`NO_PROFILE_CODE`]
pub struct FakeProvider {
    provider: IdentityProvider,
    login: String,
}

impl FakeProvider {
    pub fn github() -> Self {
        Self {
            provider: IdentityProvider::GitHub,
            login: "octocat".to_string(),
        }
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    fn provider(&self) -> IdentityProvider {
        self.provider
    }

    fn authorize_url(&self, state: &str) -> String {
        format!("https://provider.test/authorize?client_id=test&state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, FederationError> {
        if code == REJECTED_CODE {
            return Err(FederationError::Exchange("bad_verification_code".to_string()));
        }
        Ok(ProviderToken {
            provider: self.provider,
            access_token: format!("token-for-{code}"),
            refresh_token: None,
            expires_at: None,
            scopes: vec!["user:email".to_string()],
        })
    }

    async fn fetch_profile(&self, token: &ProviderToken) -> Result<FederatedProfile, FederationError> {
        if token.access_token == format!("token-for-{NO_PROFILE_CODE}") {
            return Err(FederationError::Profile("401 Bad credentials".to_string()));
        }
        Ok(FederatedProfile {
            provider: self.provider,
            subject: "583231".to_string(),
            login: self.login.clone(),
            email: Some("octocat@example.com".to_string()),
        })
    }
}
