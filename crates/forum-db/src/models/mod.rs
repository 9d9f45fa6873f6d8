//! Database models - SQLx-compatible structs for PostgreSQL tables

mod reaction;
mod user;

pub use reaction::{CommentTallyModel, ReactionModel, TallyModel};
pub use user::{CredentialsModel, UserModel};
