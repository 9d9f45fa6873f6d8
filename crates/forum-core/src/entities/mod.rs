//! Domain entities - core business objects

mod federation;
mod identity;
mod reaction;
mod user;

pub use federation::{PendingAuthorization, ProviderToken};
pub use identity::{
    Identity, IdentityKind, IdentityProvider, ProviderParseError, ANONYMOUS_DISPLAY_NAME,
    GUEST_DISPLAY_NAME,
};
pub use reaction::{
    ReactionChange, ReactionKey, ReactionOutcome, ReactionRecord, ReactionTally, ReactionTarget,
    TargetKind,
};
pub use user::{Credentials, FederatedProfile, NewUser, User};
