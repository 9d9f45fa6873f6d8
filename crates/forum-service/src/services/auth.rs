//! Authentication service
//!
//! Handles local registration and login, guest sessions and logout.

use forum_common::auth::{check_credentials, hash_password, validate_password, validate_username};
use forum_common::{AppError, SessionToken};
use forum_core::{DomainError, NewUser, GUEST_DISPLAY_NAME};
use tracing::{info, instrument, warn};

use crate::dto::{CurrentUserResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::identity::IdentityResolver;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a local account
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        validate_username(&request.username)?;
        validate_password(&request.password)?;

        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .ctx
            .user_repo()
            .create(&NewUser {
                username: request.username.clone(),
                email: request.email().map(str::to_string),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered successfully");

        Ok(user.into())
    }

    /// Check a username and password and mint a session token
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<SessionToken> {
        let credentials = self
            .ctx
            .user_repo()
            .find_credentials(&request.username)
            .await?;

        let Some(credentials) = credentials else {
            warn!("Login failed: user not found");
            // Same Argon2 cost as a real comparison
            let _ = check_credentials(&request.password, None);
            return Err(AppError::InvalidCredentials.into());
        };

        if let Err(e) = check_credentials(&request.password, credentials.password_hash.as_deref()) {
            if credentials.password_hash.is_none() {
                warn!(user_id = %credentials.user_id, "Login failed: federated account has no password");
            } else {
                warn!(user_id = %credentials.user_id, "Login failed: invalid password");
            }
            return Err(e.into());
        }

        let token = self.ctx.session_codec().issue(&credentials.username, None)?;

        info!(user_id = %credentials.user_id, "User logged in successfully");

        Ok(token)
    }

    /// Mint a guest session. Guests can read but every mutation rejects them.
    pub fn enter_as_guest(&self) -> ServiceResult<SessionToken> {
        Ok(self.ctx.session_codec().issue(GUEST_DISPLAY_NAME, None)?)
    }

    /// Identity behind the session cookie
    pub async fn current_user(&self, cookie: Option<&str>) -> ServiceResult<CurrentUserResponse> {
        let identity = IdentityResolver::new(self.ctx)
            .resolve_from_cookie(cookie)
            .await?;
        Ok(CurrentUserResponse::from(&identity))
    }

    /// Drop the provider session, if any. Session tokens are self-contained
    /// and simply stop being sent once the cookie is cleared, so a store
    /// failure here is logged and never blocks the logout.
    #[instrument(skip_all)]
    pub async fn logout(&self, provider_session: Option<&str>) {
        let Some(session_id) = provider_session else {
            return;
        };
        if let Err(e) = self.ctx.provider_sessions().remove(session_id).await {
            warn!(error = %e, "Failed to drop provider session on logout");
        }
    }
}
