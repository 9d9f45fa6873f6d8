//! User entity - a registered forum account

use chrono::{DateTime, Utc};

use crate::entities::IdentityProvider;
use crate::value_objects::UserId;

/// Registered account. Federated accounts have a provider and no password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub provider: Option<IdentityProvider>,
    pub provider_subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_federated(&self) -> bool {
        self.provider.is_some()
    }
}

/// Data for a new local account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}

/// Stored credentials looked up at login
#[derive(Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub username: String,
    /// `None` for federated accounts, which cannot log in with a password
    pub password_hash: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Profile returned by an identity provider after a code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProfile {
    pub provider: IdentityProvider,
    /// Stable account id at the provider
    pub subject: String,
    pub login: String,
    pub email: Option<String>,
}

impl FederatedProfile {
    pub fn username(&self) -> String {
        self.provider.namespaced_username(&self.login)
    }
}
