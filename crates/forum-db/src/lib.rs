//! # forum-db
//!
//! Storage layer implementing the forum-core ports.
//!
//! ## Overview
//!
//! - Connection pool management and runtime migrations
//! - Database models with SQLx `FromRow` derives and their entity mappers
//! - `PgUserRepository` (credential store) and `PgReactionStore`, whose
//!   transactions back the reaction engine
//! - `InMemoryForumStore`, a serialised in-process implementation of the same
//!   ports for tests and local development
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forum_db::{create_pool, DatabaseConfig, PgReactionStore, PgUserRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let users = PgUserRepository::new(pool.clone());
//!     let reactions = PgReactionStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::InMemoryForumStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgReactionStore, PgReactionTransaction, PgUserRepository};
