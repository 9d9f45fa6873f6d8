//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and are created per request.

pub mod auth;
pub mod context;
pub mod error;
pub mod identity;
pub mod oauth;
pub mod reaction;

pub use auth::AuthService;
pub use context::{
    ServiceContext, ServiceContextBuilder, DEFAULT_OAUTH_STATE_TTL, DEFAULT_PROVIDER_SESSION_TTL,
    DEFAULT_STORE_TIMEOUT,
};
pub use error::{ServiceError, ServiceResult};
pub use identity::IdentityResolver;
pub use oauth::{FederatedLogin, OAuthService};
pub use reaction::ReactionService;
