//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use forum_core::{CommentId, Identity, ProviderToken, ReactionRecord, ReactionTally, User};

use super::responses::{
    CommentTallyResponse, CurrentUserResponse, ProviderSessionResponse, ReactionResponse,
    UserResponse,
};

// ============================================================================
// Identity Mappers
// ============================================================================

impl From<&Identity> for CurrentUserResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            username: identity.display_name.clone(),
            user_id: identity.user_id().map(Into::into),
            is_guest: identity.is_guest(),
            provider: identity.provider(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.into_inner(),
            username: user.username.clone(),
            email: user.email.clone(),
            provider: user.provider,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&ProviderToken> for ProviderSessionResponse {
    fn from(token: &ProviderToken) -> Self {
        Self {
            provider: token.provider,
            scopes: token.scopes.clone(),
            expires_at: token.expires_at,
        }
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<&ReactionRecord> for ReactionResponse {
    fn from(record: &ReactionRecord) -> Self {
        Self {
            target_kind: record.target.kind(),
            target_id: record.target.raw_id(),
            like_type: record.polarity.value(),
            created_at: record.created_at,
        }
    }
}

impl From<(CommentId, ReactionTally)> for CommentTallyResponse {
    fn from((comment_id, tally): (CommentId, ReactionTally)) -> Self {
        Self {
            comment_id: comment_id.into_inner(),
            likes: tally.likes,
            dislikes: tally.dislikes,
        }
    }
}
