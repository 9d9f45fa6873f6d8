//! # forum-service
//!
//! Application layer: identity resolution, local and federated login, and
//! the transactional reaction engine. Storage is reached only through the
//! ports defined in `forum-core`, so the same services run against Postgres
//! and Redis in production and against the in-memory stores in tests.

pub mod dto;
pub mod federation;
pub mod services;

pub use federation::{FederationError, HttpProviderClient, ProviderClient, ProviderEndpoints};
pub use services::{
    AuthService, FederatedLogin, IdentityResolver, OAuthService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
