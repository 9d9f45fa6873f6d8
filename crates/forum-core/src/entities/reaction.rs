//! Reaction entities - likes and dislikes on threads and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{CommentId, Polarity, ThreadId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Thread,
    Comment,
}

impl TargetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thread => "thread",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The thing being reacted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Thread(ThreadId),
    Comment(CommentId),
}

impl ReactionTarget {
    pub const fn kind(self) -> TargetKind {
        match self {
            Self::Thread(_) => TargetKind::Thread,
            Self::Comment(_) => TargetKind::Comment,
        }
    }

    /// Raw id of the target row
    pub const fn raw_id(self) -> i64 {
        match self {
            Self::Thread(id) => id.into_inner(),
            Self::Comment(id) => id.into_inner(),
        }
    }

    pub fn from_parts(kind: TargetKind, id: i64) -> Self {
        match kind {
            TargetKind::Thread => Self::Thread(ThreadId::new(id)),
            TargetKind::Comment => Self::Comment(CommentId::new(id)),
        }
    }
}

impl fmt::Display for ReactionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.raw_id())
    }
}

/// Natural key of a reaction; at most one record exists per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReactionKey {
    pub target: ReactionTarget,
    pub user_id: UserId,
}

impl ReactionKey {
    pub const fn new(target: ReactionTarget, user_id: UserId) -> Self {
        Self { target, user_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRecord {
    pub target: ReactionTarget,
    pub user_id: UserId,
    pub polarity: Polarity,
    pub created_at: DateTime<Utc>,
}

impl ReactionRecord {
    pub fn new(key: ReactionKey, polarity: Polarity) -> Self {
        Self {
            target: key.target,
            user_id: key.user_id,
            polarity,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn key(&self) -> ReactionKey {
        ReactionKey::new(self.target, self.user_id)
    }
}

/// Audit row appended whenever an existing reaction flips polarity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionChange {
    pub target: ReactionTarget,
    pub user_id: UserId,
    pub from: Polarity,
    pub to: Polarity,
    pub changed_at: DateTime<Utc>,
}

impl ReactionChange {
    pub fn new(key: ReactionKey, from: Polarity, to: Polarity) -> Self {
        Self {
            target: key.target,
            user_id: key.user_id,
            from,
            to,
            changed_at: Utc::now(),
        }
    }
}

/// Like/dislike counts for a single target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionTally {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionTally {
    pub const fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    /// Count one more reaction of the given polarity
    pub fn record(&mut self, polarity: Polarity) {
        match polarity {
            Polarity::Like => self.likes += 1,
            Polarity::Dislike => self.dislikes += 1,
        }
    }

    /// Move one reaction from `from` to `to`
    pub fn shift(&mut self, from: Polarity, to: Polarity) {
        if from == to {
            return;
        }
        match from {
            Polarity::Like => self.likes -= 1,
            Polarity::Dislike => self.dislikes -= 1,
        }
        self.record(to);
    }

    #[inline]
    pub const fn total(&self) -> i64 {
        self.likes + self.dislikes
    }
}

/// What a successful reaction call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReactionOutcome {
    Recorded { polarity: Polarity },
    Changed { from: Polarity, to: Polarity },
    Unchanged { polarity: Polarity },
}
