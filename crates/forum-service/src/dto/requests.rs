//! Request DTOs for API endpoints
//!
//! Form bodies arrive as strings; the `parse` helpers turn them into typed
//! ids and polarities so malformed input fails before any store access.

use forum_core::{CommentId, Polarity, ThreadId};
use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::services::{ServiceError, ServiceResult};

// ============================================================================
// Auth Requests
// ============================================================================

/// Local account registration form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    /// Optional; an empty field counts as absent
    #[serde(default)]
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

impl RegisterRequest {
    /// Email with blank values dropped
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || email.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email format".into()))
    }
}

/// Local account login form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query string of an OAuth callback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined
    pub error: Option<String>,
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// `POST /like-dislike` form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ThreadReactionForm {
    #[validate(length(min = 1, message = "thread_id is required"))]
    pub thread_id: String,

    #[validate(length(min = 1, message = "like_type is required"))]
    pub like_type: String,
}

impl ThreadReactionForm {
    pub fn parse(&self) -> ServiceResult<(ThreadId, Polarity)> {
        let thread_id =
            ThreadId::parse(&self.thread_id).map_err(|e| ServiceError::validation(e.to_string()))?;
        let polarity = Polarity::parse(&self.like_type)?;
        Ok((thread_id, polarity))
    }
}

/// `POST /comment-like-dislike` form
///
/// `user_id` is accepted for compatibility with older pages but never used:
/// the actor is always the session identity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentReactionForm {
    #[validate(length(min = 1, message = "comment_id is required"))]
    pub comment_id: String,

    #[validate(length(min = 1, message = "like_type is required"))]
    pub like_type: String,

    /// Thread to redirect back to
    #[serde(default)]
    pub thread_id: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,
}

impl CommentReactionForm {
    pub fn parse(&self) -> ServiceResult<(CommentId, Polarity)> {
        let comment_id = CommentId::parse(&self.comment_id)
            .map_err(|e| ServiceError::validation(e.to_string()))?;
        let polarity = Polarity::parse(&self.like_type)?;
        Ok((comment_id, polarity))
    }

    /// Redirect target thread, when one was given and is well formed
    pub fn redirect_thread(&self) -> Option<ThreadId> {
        self.thread_id.as_deref().and_then(|id| ThreadId::parse(id).ok())
    }

    /// The `user_id` field, when present and numeric
    pub fn claimed_user_id(&self) -> Option<i64> {
        self.user_id.as_deref().and_then(|id| id.trim().parse().ok())
    }
}

/// `GET /thread?id=`
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadQuery {
    pub id: String,
}

impl ThreadQuery {
    pub fn parse(&self) -> ServiceResult<ThreadId> {
        ThreadId::parse(&self.id).map_err(|e| ServiceError::validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            username: "alice".to_string(),
            email: Some(String::new()),
            password: "correct horse".to_string(),
        };
        assert!(valid.validate().is_ok());
        assert_eq!(valid.email(), None);

        let bad_email = RegisterRequest {
            email: Some("not-an-email".to_string()),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_thread_form_parse() {
        let form = ThreadReactionForm {
            thread_id: "42".to_string(),
            like_type: "-1".to_string(),
        };
        assert_eq!(form.parse().unwrap(), (ThreadId::new(42), Polarity::Dislike));

        for (thread_id, like_type) in [("abc", "1"), ("0", "1"), ("42", "2"), ("42", "like")] {
            let form = ThreadReactionForm {
                thread_id: thread_id.to_string(),
                like_type: like_type.to_string(),
            };
            let err = form.parse().unwrap_err();
            assert_eq!(err.status_code(), 400, "{thread_id}/{like_type}");
        }
    }

    #[test]
    fn test_comment_form_fields() {
        let form = CommentReactionForm {
            comment_id: "9".to_string(),
            like_type: "1".to_string(),
            thread_id: Some("3".to_string()),
            user_id: Some("77".to_string()),
        };
        assert_eq!(form.parse().unwrap(), (CommentId::new(9), Polarity::Like));
        assert_eq!(form.redirect_thread(), Some(ThreadId::new(3)));
        assert_eq!(form.claimed_user_id(), Some(77));
    }
}
