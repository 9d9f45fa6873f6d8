//! # forum-cache
//!
//! Redis storage for the federated login flow.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **OAuth State**: single-use state nonces issued at the authorization redirect
//! - **Provider Sessions**: provider access tokens keyed by the `oauth_session` cookie
//! - **In-memory variants** of both stores for tests and local development
//!
//! ## Example
//!
//! ```ignore
//! use forum_cache::{RedisPool, RedisPoolConfig, RedisOAuthStateStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let states = RedisOAuthStateStore::new(pool.clone());
//! states.put(&nonce, &pending, Duration::from_secs(600)).await?;
//! ```

pub mod memory;
pub mod pool;
pub mod session;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export session stores
pub use memory::{InMemoryOAuthStateStore, InMemoryProviderSessionStore};
pub use session::{RedisOAuthStateStore, RedisProviderSessionStore};
