//! Redis-backed session containers for the federated login flow

mod oauth_state;
mod provider_session;

pub use oauth_state::RedisOAuthStateStore;
pub use provider_session::RedisProviderSessionStore;
