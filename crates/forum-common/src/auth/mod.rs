//! Authentication primitives

mod password;
mod session_token;

pub use password::{
    check_credentials, hash_password, validate_password, validate_username, verify_password,
};
pub use session_token::{
    SessionClaims, SessionCodec, SessionToken, SigningKey, TokenError, DEFAULT_SESSION_TTL_HOURS,
};
