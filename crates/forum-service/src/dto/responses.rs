//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use forum_core::{IdentityProvider, TargetKind};
use serde::Serialize;

// ============================================================================
// Identity Responses
// ============================================================================

/// `GET /api/get-current-user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub user_id: Option<i64>,
    pub is_guest: bool,
    pub provider: Option<IdentityProvider>,
}

/// Registered account
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub provider: Option<IdentityProvider>,
    pub created_at: DateTime<Utc>,
}

/// Provider session metadata; the token itself never leaves the server
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSessionResponse {
    pub provider: IdentityProvider,
    pub scopes: Vec<String>,
    pub expires_at: Option<i64>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// One reaction of the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionResponse {
    pub target_kind: TargetKind,
    pub target_id: i64,
    pub like_type: i16,
    pub created_at: DateTime<Utc>,
}

/// Aggregated counts of one comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentTallyResponse {
    pub comment_id: i64,
    pub likes: i64,
    pub dislikes: i64,
}

/// `GET /thread?id=`
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummaryResponse {
    pub thread_id: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comments: Vec<CommentTallyResponse>,
    pub viewer: CurrentUserResponse,
    /// Empty for guests
    pub viewer_reactions: Vec<ReactionResponse>,
}

/// `GET /api/profile/reactions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileReactionsResponse {
    pub username: String,
    pub liked_threads: Vec<i64>,
    pub disliked_threads: Vec<i64>,
    pub liked_comments: Vec<i64>,
    pub disliked_comments: Vec<i64>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing store
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub sessions: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, sessions_healthy: bool) -> Self {
        let label = |ok: bool| if ok { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && sessions_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                sessions: label(sessions_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_serialization() {
        let user = CurrentUserResponse {
            username: "github:octocat".to_string(),
            user_id: Some(8),
            is_guest: false,
            provider: Some(IdentityProvider::GitHub),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "github:octocat");
        assert_eq!(json["user_id"], 8);
        assert_eq!(json["provider"], "github");
    }

    #[test]
    fn test_reaction_serialization() {
        let reaction = ReactionResponse {
            target_kind: TargetKind::Comment,
            target_id: 3,
            like_type: -1,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&reaction).unwrap();
        assert_eq!(json["target_kind"], "comment");
        assert_eq!(json["like_type"], -1);
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy();
        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true, true);
        assert!(ready.is_ready());
        assert_eq!(ready.checks.database, "healthy");

        let not_ready = ReadinessResponse::ready(true, false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.sessions, "unhealthy");
    }
}
