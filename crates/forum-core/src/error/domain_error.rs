//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{CommentId, ThreadId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// A session names a username that no longer exists
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(ThreadId),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Invalid reaction value: {0:?} (expected 1 or -1)")]
    InvalidPolarity(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Guests cannot perform this action")]
    GuestNotAllowed,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameAlreadyExists,

    #[error("Already reacted to this {0}")]
    ReactionAlreadyExists(crate::entities::TargetKind),

    #[error("No reaction to change on this {0}")]
    NotReacted(crate::entities::TargetKind),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Storage operation timed out after {0} ms")]
    StoreTimeout(u64),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::UnknownUser(_) => "UNKNOWN_USER",
            Self::ThreadNotFound(_) => "UNKNOWN_THREAD",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Validation
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidPolarity(_) => "INVALID_REACTION",

            // Authorization
            Self::GuestNotAllowed => "GUEST_NOT_ALLOWED",

            // Conflict
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            Self::ReactionAlreadyExists(_) => "ALREADY_REACTED",
            Self::NotReacted(_) => "NOT_REACTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::StoreTimeout(_) => "STORAGE_TIMEOUT",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ThreadNotFound(_) | Self::CommentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidUsername(_) | Self::WeakPassword(_) | Self::InvalidPolarity(_)
        )
    }

    /// Check if this error means "no usable identity"
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::UnknownUser(_) | Self::GuestNotAllowed)
    }

    /// Check if this is a storage-side failure
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::StoreTimeout(_)
        )
    }

    /// HTTP status used on the wire.
    ///
    /// Reaction conflicts are reported as 403 and guests as 401, matching what
    /// the forum's browser forms expect.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReactionAlreadyExists(_) | Self::NotReacted(_) => 403,
            Self::UsernameAlreadyExists => 409,
            e if e.is_not_found() => 404,
            e if e.is_validation() => 400,
            e if e.is_authentication() => 401,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TargetKind;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound(UserId::new(1));
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::ReactionAlreadyExists(TargetKind::Thread);
        assert_eq!(err.code(), "ALREADY_REACTED");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::ThreadNotFound(ThreadId::new(1)).is_not_found());
        assert!(DomainError::CommentNotFound(CommentId::new(1)).is_not_found());
        assert!(!DomainError::UsernameAlreadyExists.is_not_found());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::ReactionAlreadyExists(TargetKind::Comment).status_code(), 403);
        assert_eq!(DomainError::GuestNotAllowed.status_code(), 401);
        assert_eq!(DomainError::UnknownUser("bob".into()).status_code(), 401);
        assert_eq!(DomainError::InvalidPolarity("0".into()).status_code(), 400);
        assert_eq!(DomainError::ThreadNotFound(ThreadId::new(9)).status_code(), 404);
        assert_eq!(DomainError::StoreTimeout(500).status_code(), 500);
        assert_eq!(DomainError::UsernameAlreadyExists.status_code(), 409);
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::ThreadNotFound(ThreadId::new(123));
        assert_eq!(err.to_string(), "Thread not found: 123");

        let err = DomainError::ReactionAlreadyExists(TargetKind::Thread);
        assert_eq!(err.to_string(), "Already reacted to this thread");
    }
}
