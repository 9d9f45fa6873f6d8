//! Ports implemented by the storage and cache crates

mod repositories;
mod sessions;

pub use repositories::{ReactionStore, ReactionTransaction, RepoResult, UserRepository};
pub use sessions::{OAuthStateStore, ProviderSessionStore};
