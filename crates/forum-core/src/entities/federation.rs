//! Federated login state kept between redirect and callback

use serde::{Deserialize, Serialize};

use crate::entities::IdentityProvider;

/// Server-side record of an authorization redirect, keyed by its state nonce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub provider: IdentityProvider,
    /// Unix seconds
    pub created_at: i64,
}

/// Access token obtained from a provider, stored in the provider session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderToken {
    pub provider: IdentityProvider,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix seconds, when the provider reported a lifetime
    pub expires_at: Option<i64>,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for ProviderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderToken")
            .field("provider", &self.provider)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}
