//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    Credentials, FederatedProfile, NewUser, ReactionChange, ReactionKey, ReactionRecord,
    ReactionTally, ReactionTarget, User,
};
use crate::error::DomainError;
use crate::value_objects::{CommentId, Polarity, ThreadId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository (credential store)
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a local account. A duplicate username fails with
    /// `UsernameAlreadyExists`.
    async fn create(&self, user: &NewUser) -> RepoResult<User>;

    /// Look up the id and password hash for a username
    async fn find_credentials(&self, username: &str) -> RepoResult<Option<Credentials>>;

    /// Insert or refresh the account linked to a provider subject
    async fn upsert_federated(&self, profile: &FederatedProfile) -> RepoResult<User>;

    /// Delete a user
    async fn delete(&self, id: UserId) -> RepoResult<()>;
}

// ============================================================================
// Reaction Store
// ============================================================================

/// Entry point of the reaction engine's storage.
///
/// Writes go through [`ReactionTransaction`]; the plain methods are
/// read-only and never observe a half-applied reaction.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Open a unit of work. Dropping it without calling `commit` rolls back.
    async fn begin(&self) -> RepoResult<Box<dyn ReactionTransaction>>;

    /// Stored counters of a thread, `None` if the thread does not exist
    async fn thread_counters(&self, thread_id: ThreadId) -> RepoResult<Option<ReactionTally>>;

    /// Live aggregation over the reaction records of a target
    async fn aggregate(&self, target: ReactionTarget) -> RepoResult<ReactionTally>;

    /// Aggregated tallies for every comment of a thread, ordered by comment id
    async fn comment_tallies(&self, thread_id: ThreadId)
        -> RepoResult<Vec<(CommentId, ReactionTally)>>;

    /// Find a single reaction
    async fn find(&self, key: &ReactionKey) -> RepoResult<Option<ReactionRecord>>;

    /// Reactions of a user on a thread and on the thread's comments
    async fn find_in_thread(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
    ) -> RepoResult<Vec<ReactionRecord>>;

    /// All reactions of a user, newest first
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<ReactionRecord>>;

    /// Check the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

/// One store transaction of the reaction engine
#[async_trait]
pub trait ReactionTransaction: Send {
    async fn target_exists(&mut self, target: ReactionTarget) -> RepoResult<bool>;

    /// Current polarity for the key, read inside the transaction
    async fn find_polarity(&mut self, key: &ReactionKey) -> RepoResult<Option<Polarity>>;

    /// Insert a new record. A concurrent duplicate fails with
    /// `ReactionAlreadyExists`.
    async fn insert_reaction(&mut self, record: &ReactionRecord) -> RepoResult<()>;

    async fn update_polarity(&mut self, key: &ReactionKey, polarity: Polarity) -> RepoResult<()>;

    /// Add `delta` to the thread's `likes` or `dislikes` counter
    async fn adjust_thread_counter(
        &mut self,
        thread_id: ThreadId,
        polarity: Polarity,
        delta: i64,
    ) -> RepoResult<()>;

    /// Append to the reaction change log
    async fn record_change(&mut self, change: &ReactionChange) -> RepoResult<()>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
