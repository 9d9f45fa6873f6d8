//! Identity provider clients for the authorization-code flow
//!
//! [`ProviderClient`] is the seam between the OAuth service and the outside
//! world. [`HttpProviderClient`] talks to the real Google, GitHub and
//! Facebook endpoints; tests plug in their own implementation.

mod client;
mod endpoints;

use async_trait::async_trait;
use forum_core::{FederatedProfile, IdentityProvider, ProviderToken};

pub use client::HttpProviderClient;
pub use endpoints::ProviderEndpoints;

#[derive(Debug, thiserror::Error)]
pub enum FederationError {
    #[error("invalid provider configuration: {0}")]
    Configuration(String),

    #[error("code exchange failed: {0}")]
    Exchange(String),

    #[error("profile lookup failed: {0}")]
    Profile(String),
}

#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn provider(&self) -> IdentityProvider;

    /// URL the browser is redirected to, carrying `state`
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for an access token
    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, FederationError>;

    /// Look up who the token belongs to
    async fn fetch_profile(&self, token: &ProviderToken) -> Result<FederatedProfile, FederationError>;
}
