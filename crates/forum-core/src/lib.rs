//! # forum-core
//!
//! Domain layer containing identities, reaction records, value objects and the
//! storage ports implemented by the infrastructure crates.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Credentials, FederatedProfile, Identity, IdentityKind, IdentityProvider, NewUser,
    PendingAuthorization, ProviderParseError, ProviderToken, ReactionChange, ReactionKey,
    ReactionOutcome, ReactionRecord, ReactionTally, ReactionTarget, TargetKind, User,
    ANONYMOUS_DISPLAY_NAME, GUEST_DISPLAY_NAME,
};
pub use error::DomainError;
pub use traits::{
    OAuthStateStore, ProviderSessionStore, ReactionStore, ReactionTransaction, RepoResult,
    UserRepository,
};
pub use value_objects::{CommentId, IdParseError, Polarity, ThreadId, UserId};
