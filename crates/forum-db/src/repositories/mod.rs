//! Repository implementations
//!
//! PostgreSQL implementations of the storage ports defined in forum-core.

mod error;
mod reaction;
mod user;

pub use reaction::{PgReactionStore, PgReactionTransaction};
pub use user::PgUserRepository;
