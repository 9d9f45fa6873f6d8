//! Identity - the canonical "who is acting" value handed to the reaction path
//!
//! Three sources produce an identity: a local password account, a federated
//! OAuth login and an anonymous guest session. The variant is carried in
//! [`IdentityKind`]; a guest never has a user id, so `is_guest() ⇔
//! user_id().is_none()` holds by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::UserId;

/// Display name carried by tokens minted for guest sessions
pub const GUEST_DISPLAY_NAME: &str = "guest";

/// Display name used for read paths that have no usable session at all
pub const ANONYMOUS_DISPLAY_NAME: &str = "Guest";

/// External identity providers supported for federated login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    Google,
    GitHub,
    Facebook,
}

impl IdentityProvider {
    pub const ALL: [Self; 3] = [Self::Google, Self::GitHub, Self::Facebook];

    /// Path segment and username namespace for this provider
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
            Self::Facebook => "facebook",
        }
    }

    /// Username a federated account is stored under, e.g. `github:octocat`
    pub fn namespaced_username(self, login: &str) -> String {
        format!("{}:{}", self.as_str(), login)
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown identity provider: {0}")]
pub struct ProviderParseError(pub String);

impl std::str::FromStr for IdentityProvider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            "facebook" => Ok(Self::Facebook),
            _ => Err(ProviderParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    Local { user_id: UserId },
    Federated { provider: IdentityProvider, user_id: UserId },
    Guest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_name: String,
    pub kind: IdentityKind,
}

impl Identity {
    pub fn local(display_name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            display_name: display_name.into(),
            kind: IdentityKind::Local { user_id },
        }
    }

    pub fn federated(
        display_name: impl Into<String>,
        provider: IdentityProvider,
        user_id: UserId,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            kind: IdentityKind::Federated { provider, user_id },
        }
    }

    /// Identity of a session that entered through "continue as guest"
    pub fn guest() -> Self {
        Self {
            display_name: GUEST_DISPLAY_NAME.to_string(),
            kind: IdentityKind::Guest,
        }
    }

    /// Fallback for read paths without a valid session
    pub fn anonymous() -> Self {
        Self {
            display_name: ANONYMOUS_DISPLAY_NAME.to_string(),
            kind: IdentityKind::Guest,
        }
    }

    #[inline]
    pub fn is_guest(&self) -> bool {
        matches!(self.kind, IdentityKind::Guest)
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self.kind {
            IdentityKind::Local { user_id } | IdentityKind::Federated { user_id, .. } => {
                Some(user_id)
            }
            IdentityKind::Guest => None,
        }
    }

    pub fn provider(&self) -> Option<IdentityProvider> {
        match self.kind {
            IdentityKind::Federated { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_has_no_user_id() {
        for identity in [Identity::guest(), Identity::anonymous()] {
            assert!(identity.is_guest());
            assert_eq!(identity.user_id(), None);
        }
        assert_eq!(Identity::guest().display_name, "guest");
        assert_eq!(Identity::anonymous().display_name, "Guest");
    }

    #[test]
    fn test_registered_identities_have_user_id() {
        let local = Identity::local("alice", UserId::new(7));
        assert!(!local.is_guest());
        assert_eq!(local.user_id(), Some(UserId::new(7)));
        assert_eq!(local.provider(), None);

        let federated =
            Identity::federated("github:octocat", IdentityProvider::GitHub, UserId::new(8));
        assert_eq!(federated.user_id(), Some(UserId::new(8)));
        assert_eq!(federated.provider(), Some(IdentityProvider::GitHub));
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("GitHub".parse::<IdentityProvider>().unwrap(), IdentityProvider::GitHub);
        assert_eq!("google".parse::<IdentityProvider>().unwrap(), IdentityProvider::Google);
        assert!("twitter".parse::<IdentityProvider>().is_err());
        assert_eq!(
            IdentityProvider::Facebook.namespaced_username("jo"),
            "facebook:jo"
        );
    }
}
