//! Session tokens for the `session_token` cookie
//!
//! Tokens are HS256 JWTs carrying the display name and an absolute expiry.
//! The signing key is generated from the OS random source when the process
//! starts and is never persisted, so every restart invalidates all sessions.

use chrono::{DateTime, Duration, TimeZone, Utc};
use forum_core::{IdentityProvider, GUEST_DISPLAY_NAME};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed token, or signed with another key
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Process-wide HMAC key
#[derive(Clone)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Draw a fresh key from the OS CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Display name (username, namespaced federated username, or "guest")
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Identity provider for federated sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp: Option<IdentityProvider>,
}

impl SessionClaims {
    #[inline]
    pub fn display_name(&self) -> &str {
        &self.sub
    }

    pub fn is_guest(&self) -> bool {
        self.sub == GUEST_DISPLAY_NAME
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A freshly minted token, ready to be set as a cookie
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(key: &SigningKey, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&key.0),
            decoding_key: DecodingKey::from_secret(&key.0),
            ttl,
        }
    }

    /// Codec with the default 24 hour lifetime
    pub fn with_default_ttl(key: &SigningKey) -> Self {
        Self::new(key, Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(
        &self,
        display_name: &str,
        provider: Option<IdentityProvider>,
    ) -> Result<SessionToken, TokenError> {
        self.issue_at(display_name, provider, Utc::now())
    }

    pub fn issue_at(
        &self,
        display_name: &str,
        provider: Option<IdentityProvider>,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, TokenError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: display_name.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            idp: provider,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(SessionToken {
            token,
            display_name: claims.sub,
            expires_at,
        })
    }

    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.decode_at(token, Utc::now())
    }

    /// Verify the signature, then the expiry against `now`.
    ///
    /// A token signed with another key is `InvalidSignature` even when it has
    /// also expired.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::InvalidSignature)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SessionCodec {
        SessionCodec::with_default_ttl(&SigningKey::from_bytes([7u8; 32]))
    }

    #[test]
    fn test_issue_then_decode() {
        let codec = codec();
        let token = codec.issue("alice", None).unwrap();

        let claims = codec.decode(&token.token).unwrap();
        assert_eq!(claims.display_name(), "alice");
        assert!(!claims.is_guest());
        assert_eq!(claims.idp, None);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_guest_token() {
        let codec = codec();
        let token = codec.issue(GUEST_DISPLAY_NAME, None).unwrap();
        assert!(codec.decode(&token.token).unwrap().is_guest());
    }

    #[test]
    fn test_provider_claim() {
        let codec = codec();
        let token = codec
            .issue("github:octocat", Some(IdentityProvider::GitHub))
            .unwrap();
        let claims = codec.decode(&token.token).unwrap();
        assert_eq!(claims.idp, Some(IdentityProvider::GitHub));
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let token = codec.issue_at("alice", None, issued).unwrap();
        assert_eq!(token.expires_at, issued + Duration::hours(24));

        let just_before = issued + Duration::hours(24) - Duration::seconds(1);
        assert!(codec.decode_at(&token.token, just_before).is_ok());

        let at_expiry = issued + Duration::hours(24);
        assert_eq!(codec.decode_at(&token.token, at_expiry), Err(TokenError::Expired));

        let after = issued + Duration::days(3);
        assert_eq!(codec.decode_at(&token.token, after), Err(TokenError::Expired));
    }

    #[test]
    fn test_foreign_key_is_invalid_signature() {
        let ours = codec();
        let theirs = SessionCodec::with_default_ttl(&SigningKey::from_bytes([9u8; 32]));
        let token = theirs.issue("alice", None).unwrap();

        assert_eq!(ours.decode(&token.token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_foreign_key_expired_token_is_still_invalid_signature() {
        let ours = codec();
        let theirs = SessionCodec::with_default_ttl(&SigningKey::from_bytes([9u8; 32]));
        let issued = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let token = theirs.issue_at("alice", None, issued).unwrap();

        assert_eq!(ours.decode(&token.token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_generated_keys_differ() {
        let first = SessionCodec::with_default_ttl(&SigningKey::generate());
        let second = SessionCodec::with_default_ttl(&SigningKey::generate());
        let token = first.issue("alice", None).unwrap();

        assert!(first.decode(&token.token).is_ok());
        assert_eq!(second.decode(&token.token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token() {
        assert_eq!(codec().decode("not.a.jwt"), Err(TokenError::InvalidSignature));
        assert_eq!(codec().decode(""), Err(TokenError::InvalidSignature));
    }
}
