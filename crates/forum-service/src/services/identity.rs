//! Identity resolution
//!
//! Turns the `session_token` cookie into the canonical [`Identity`] used by
//! every other service. Local and federated accounts resolve through the
//! same path: the token carries the (possibly namespaced) username, which is
//! looked up in the credential store.

use forum_common::AppError;
use forum_core::{DomainError, Identity, UserId};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Identity resolver
pub struct IdentityResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve a token string.
    ///
    /// Guest tokens short-circuit without a store lookup. Anything else must
    /// name an existing user, or the call fails with `UnknownUser`.
    #[instrument(skip_all)]
    pub async fn resolve_token(&self, token: &str) -> ServiceResult<Identity> {
        let claims = self.ctx.session_codec().decode(token)?;

        if claims.is_guest() {
            return Ok(Identity::guest());
        }

        let user = self
            .ctx
            .bounded(self.ctx.user_repo().find_by_username(claims.display_name()))
            .await?
            .ok_or_else(|| DomainError::UnknownUser(claims.sub.clone()))?;

        Ok(match user.provider {
            Some(provider) => Identity::federated(user.username, provider, user.id),
            None => Identity::local(user.username, user.id),
        })
    }

    /// Resolve the cookie of a request that needs an identity
    pub async fn resolve_from_cookie(&self, cookie: Option<&str>) -> ServiceResult<Identity> {
        match cookie {
            Some(token) if !token.is_empty() => self.resolve_token(token).await,
            _ => Err(AppError::MissingAuth.into()),
        }
    }

    /// Resolve for pages that render for everyone. Any failure falls back to
    /// the anonymous guest.
    pub async fn resolve_for_read(&self, cookie: Option<&str>) -> Identity {
        match self.resolve_from_cookie(cookie).await {
            Ok(identity) => identity,
            Err(e) => {
                debug!(error = %e, "Falling back to anonymous identity");
                Identity::anonymous()
            }
        }
    }

    /// The user id of a registered identity. Guests may read but never write.
    pub fn require_non_guest(identity: &Identity) -> ServiceResult<UserId> {
        identity
            .user_id()
            .ok_or(ServiceError::Domain(DomainError::GuestNotAllowed))
    }
}
