//! Federated login service
//!
//! `begin_login` issues a random single-use state nonce and hands back the
//! provider's authorization URL. `complete_login` consumes the nonce,
//! exchanges the code and links the provider profile to a forum account, so
//! the caller ends up with an ordinary session token. Only then is the
//! provider token stored, under a newly minted provider session id.

use chrono::Utc;
use forum_common::{AppError, SessionToken};
use forum_core::{IdentityProvider, PendingAuthorization};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{ProviderSessionResponse, UserResponse};
use crate::federation::ProviderClient;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const STATE_NONCE_LEN: usize = 32;

/// Result of a completed federated login
#[derive(Debug, Clone)]
pub struct FederatedLogin {
    pub session: SessionToken,
    /// Value for the `oauth_session` cookie
    pub provider_session_id: String,
    pub user: UserResponse,
}

/// OAuth federation service
pub struct OAuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OAuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn client(&self, provider: IdentityProvider) -> ServiceResult<&'a dyn ProviderClient> {
        self.ctx
            .provider(provider)
            .ok_or_else(|| ServiceError::not_found("Provider", provider.as_str()))
    }

    /// Start the authorization-code flow and return the redirect URL
    #[instrument(skip(self))]
    pub async fn begin_login(&self, provider: IdentityProvider) -> ServiceResult<String> {
        let client = self.client(provider)?;

        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_NONCE_LEN)
            .map(char::from)
            .collect();

        let pending = PendingAuthorization {
            provider,
            created_at: Utc::now().timestamp(),
        };
        self.ctx
            .oauth_states()
            .put(&nonce, &pending, self.ctx.oauth_state_ttl())
            .await?;

        Ok(client.authorize_url(&nonce))
    }

    /// Finish the flow started by [`begin_login`](Self::begin_login).
    ///
    /// `provider_session` is the current `oauth_session` cookie. Its stored
    /// token is dropped and replaced by one under a newly minted id.
    #[instrument(skip(self, code, state, provider_session))]
    pub async fn complete_login(
        &self,
        provider: IdentityProvider,
        code: &str,
        state: &str,
        provider_session: Option<&str>,
    ) -> ServiceResult<FederatedLogin> {
        let client = self.client(provider)?;

        // Consume the nonce before anything else so it can never be replayed
        let pending = self.ctx.oauth_states().take(state).await?;
        match pending {
            Some(p) if p.provider == provider => {}
            Some(p) => {
                warn!(issued_for = %p.provider, "OAuth state presented to the wrong provider");
                return Err(AppError::InvalidOAuthState.into());
            }
            None => {
                warn!("Unknown or expired OAuth state");
                return Err(AppError::InvalidOAuthState.into());
            }
        }

        if code.is_empty() {
            return Err(AppError::ExchangeFailed("missing authorization code".to_string()).into());
        }

        let token = client.exchange_code(code).await?;
        let profile = client.fetch_profile(&token).await?;
        let user = self.ctx.user_repo().upsert_federated(&profile).await?;
        let session = self.ctx.session_codec().issue(&user.username, Some(provider))?;

        // A presented id is never adopted; the browser gets a fresh one
        if let Some(previous) = provider_session.filter(|id| !id.is_empty()) {
            if let Err(e) = self.ctx.provider_sessions().remove(previous).await {
                warn!(error = %e, "Failed to drop previous provider session");
            }
        }
        let session_id = Uuid::new_v4().to_string();
        self.ctx
            .provider_sessions()
            .save(&session_id, &token, self.ctx.provider_session_ttl())
            .await?;

        info!(user_id = %user.id, "Federated login completed");

        Ok(FederatedLogin {
            session,
            provider_session_id: session_id,
            user: user.into(),
        })
    }

    /// Metadata of the provider session behind an `oauth_session` cookie
    pub async fn provider_session(
        &self,
        session_id: Option<&str>,
    ) -> ServiceResult<ProviderSessionResponse> {
        let session_id = session_id.ok_or(AppError::MissingAuth)?;
        let token = self
            .ctx
            .provider_sessions()
            .load(session_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Provider session", session_id))?;

        Ok(ProviderSessionResponse::from(&token))
    }
}
