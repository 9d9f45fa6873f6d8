//! Axum extractors for request handling
//!
//! Custom extractors for session cookies, resolved identities and
//! validated form and query input.

mod auth;
mod validated;

pub use auth::{
    removal_cookie, session_cookie, CurrentIdentity, SessionCookies, ViewerIdentity,
    PROVIDER_SESSION_COOKIE, SESSION_COOKIE,
};
pub use validated::{QueryParams, ValidatedForm};
