//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for form and query inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CommentReactionForm, LoginRequest, OAuthCallbackQuery, RegisterRequest, ThreadQuery,
    ThreadReactionForm,
};

pub use responses::{
    CommentTallyResponse, CurrentUserResponse, HealthChecks, HealthResponse,
    ProfileReactionsResponse, ProviderSessionResponse, ReactionResponse, ReadinessResponse,
    ThreadSummaryResponse, UserResponse,
};
