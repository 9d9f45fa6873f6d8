//! Reaction database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row of `thread_likes` or `comment_likes`, tagged with its table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub target_kind: String,
    pub target_id: i64,
    pub user_id: i64,
    pub like_type: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct TallyModel {
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct CommentTallyModel {
    pub comment_id: i64,
    pub likes: i64,
    pub dislikes: i64,
}
