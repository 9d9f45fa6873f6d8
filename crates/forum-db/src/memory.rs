//! In-memory store for tests and local development
//!
//! One async mutex guards the whole state. A reaction transaction holds the
//! lock for its lifetime and works on a copy, so transactions are serialised
//! and a dropped transaction leaves no trace.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use forum_core::traits::{ReactionStore, ReactionTransaction, RepoResult, UserRepository};
use forum_core::{
    CommentId, Credentials, DomainError, FederatedProfile, NewUser, Polarity, ReactionChange,
    ReactionKey, ReactionRecord, ReactionTally, ReactionTarget, ThreadId, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ForumState {
    users: BTreeMap<UserId, StoredUser>,
    threads: BTreeMap<ThreadId, ReactionTally>,
    comments: BTreeMap<CommentId, ThreadId>,
    reactions: HashMap<ReactionKey, ReactionRecord>,
    changes: Vec<ReactionChange>,
    next_user_id: i64,
    next_thread_id: i64,
    next_comment_id: i64,
}

impl ForumState {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn user_by_name(&self, username: &str) -> Option<&StoredUser> {
        self.users.values().find(|u| u.user.username == username)
    }

    fn tally_records<'a>(records: impl Iterator<Item = &'a ReactionRecord>) -> ReactionTally {
        let mut tally = ReactionTally::default();
        for record in records {
            tally.record(record.polarity);
        }
        tally
    }
}

/// Failure switches for exercising rollback and timeout paths
#[derive(Debug, Default)]
struct Faults {
    fail_counter_update: AtomicBool,
    begin_delay_ms: AtomicU64,
}

/// Shared in-memory implementation of the user repository and reaction store
#[derive(Clone, Default)]
pub struct InMemoryForumStore {
    state: Arc<Mutex<ForumState>>,
    faults: Arc<Faults>,
}

impl InMemoryForumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a thread with zeroed counters
    pub async fn create_thread(&self) -> ThreadId {
        let mut state = self.state.lock().await;
        let id = ThreadId::new(ForumState::next_id(&mut state.next_thread_id));
        state.threads.insert(id, ReactionTally::default());
        id
    }

    pub async fn create_comment(&self, thread_id: ThreadId) -> RepoResult<CommentId> {
        let mut state = self.state.lock().await;
        if !state.threads.contains_key(&thread_id) {
            return Err(DomainError::ThreadNotFound(thread_id));
        }
        let id = CommentId::new(ForumState::next_id(&mut state.next_comment_id));
        state.comments.insert(id, thread_id);
        Ok(id)
    }

    /// Audit rows written so far
    pub async fn changes(&self) -> Vec<ReactionChange> {
        self.state.lock().await.changes.clone()
    }

    /// Make every following counter update fail with a database error
    pub fn fail_counter_updates(&self, fail: bool) {
        self.faults.fail_counter_update.store(fail, Ordering::SeqCst);
    }

    /// Delay each `begin` by `delay`
    pub fn delay_transactions(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.faults.begin_delay_ms.store(ms, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryForumStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.user_by_name(username).map(|u| u.user.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let state = self.state.lock().await;
        Ok(state.user_by_name(username).is_some())
    }

    async fn create(&self, new_user: &NewUser) -> RepoResult<User> {
        let mut state = self.state.lock().await;
        if state.user_by_name(&new_user.username).is_some() {
            return Err(DomainError::UsernameAlreadyExists);
        }

        let user = User {
            id: UserId::new(ForumState::next_id(&mut state.next_user_id)),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            provider: None,
            provider_subject: None,
            created_at: Utc::now(),
        };
        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: Some(new_user.password_hash.clone()),
            },
        );
        Ok(user)
    }

    async fn find_credentials(&self, username: &str) -> RepoResult<Option<Credentials>> {
        let state = self.state.lock().await;
        Ok(state.user_by_name(username).map(|u| Credentials {
            user_id: u.user.id,
            username: u.user.username.clone(),
            password_hash: u.password_hash.clone(),
        }))
    }

    async fn upsert_federated(&self, profile: &FederatedProfile) -> RepoResult<User> {
        let mut state = self.state.lock().await;
        let username = profile.username();

        let existing = state
            .users
            .values()
            .find(|u| {
                u.user.provider == Some(profile.provider)
                    && u.user.provider_subject.as_deref() == Some(profile.subject.as_str())
            })
            .map(|u| u.user.id);

        if let Some(taken) = state.user_by_name(&username) {
            if Some(taken.user.id) != existing {
                return Err(DomainError::UsernameAlreadyExists);
            }
        }

        if let Some(id) = existing {
            let stored = state
                .users
                .get_mut(&id)
                .ok_or(DomainError::UserNotFound(id))?;
            stored.user.username = username;
            if profile.email.is_some() {
                stored.user.email.clone_from(&profile.email);
            }
            return Ok(stored.user.clone());
        }

        let user = User {
            id: UserId::new(ForumState::next_id(&mut state.next_user_id)),
            username,
            email: profile.email.clone(),
            provider: Some(profile.provider),
            provider_subject: Some(profile.subject.clone()),
            created_at: Utc::now(),
        };
        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: None,
            },
        );
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.users.remove(&id).is_none() {
            return Err(DomainError::UserNotFound(id));
        }

        let removed: Vec<ReactionRecord> = state
            .reactions
            .values()
            .filter(|r| r.user_id == id)
            .cloned()
            .collect();
        for record in removed {
            state.reactions.remove(&record.key());
            if let ReactionTarget::Thread(thread_id) = record.target {
                if let Some(counters) = state.threads.get_mut(&thread_id) {
                    match record.polarity {
                        Polarity::Like => counters.likes -= 1,
                        Polarity::Dislike => counters.dislikes -= 1,
                    }
                }
            }
        }
        state.changes.retain(|c| c.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl ReactionStore for InMemoryForumStore {
    async fn begin(&self) -> RepoResult<Box<dyn ReactionTransaction>> {
        let delay = self.faults.begin_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            working,
            faults: Arc::clone(&self.faults),
        }))
    }

    async fn thread_counters(&self, thread_id: ThreadId) -> RepoResult<Option<ReactionTally>> {
        let state = self.state.lock().await;
        Ok(state.threads.get(&thread_id).copied())
    }

    async fn aggregate(&self, target: ReactionTarget) -> RepoResult<ReactionTally> {
        let state = self.state.lock().await;
        Ok(ForumState::tally_records(
            state.reactions.values().filter(|r| r.target == target),
        ))
    }

    async fn comment_tallies(
        &self,
        thread_id: ThreadId,
    ) -> RepoResult<Vec<(CommentId, ReactionTally)>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|(_, owner)| **owner == thread_id)
            .map(|(comment_id, _)| {
                let target = ReactionTarget::Comment(*comment_id);
                let tally =
                    ForumState::tally_records(state.reactions.values().filter(|r| r.target == target));
                (*comment_id, tally)
            })
            .collect())
    }

    async fn find(&self, key: &ReactionKey) -> RepoResult<Option<ReactionRecord>> {
        let state = self.state.lock().await;
        Ok(state.reactions.get(key).cloned())
    }

    async fn find_in_thread(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
    ) -> RepoResult<Vec<ReactionRecord>> {
        let state = self.state.lock().await;
        let mut records: Vec<ReactionRecord> = state
            .reactions
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| match r.target {
                ReactionTarget::Thread(id) => id == thread_id,
                ReactionTarget::Comment(id) => state.comments.get(&id) == Some(&thread_id),
            })
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.target.kind() as u8, r.target.raw_id()));
        Ok(records)
    }

    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<ReactionRecord>> {
        let state = self.state.lock().await;
        let mut records: Vec<ReactionRecord> = state
            .reactions
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

/// Serialised transaction over a private copy of the state
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<ForumState>,
    working: ForumState,
    faults: Arc<Faults>,
}

#[async_trait]
impl ReactionTransaction for InMemoryTransaction {
    async fn target_exists(&mut self, target: ReactionTarget) -> RepoResult<bool> {
        Ok(match target {
            ReactionTarget::Thread(id) => self.working.threads.contains_key(&id),
            ReactionTarget::Comment(id) => self.working.comments.contains_key(&id),
        })
    }

    async fn find_polarity(&mut self, key: &ReactionKey) -> RepoResult<Option<Polarity>> {
        Ok(self.working.reactions.get(key).map(|r| r.polarity))
    }

    async fn insert_reaction(&mut self, record: &ReactionRecord) -> RepoResult<()> {
        let key = record.key();
        if self.working.reactions.contains_key(&key) {
            return Err(DomainError::ReactionAlreadyExists(key.target.kind()));
        }
        self.working.reactions.insert(key, record.clone());
        Ok(())
    }

    async fn update_polarity(&mut self, key: &ReactionKey, polarity: Polarity) -> RepoResult<()> {
        let record = self
            .working
            .reactions
            .get_mut(key)
            .ok_or(DomainError::NotReacted(key.target.kind()))?;
        record.polarity = polarity;
        Ok(())
    }

    async fn adjust_thread_counter(
        &mut self,
        thread_id: ThreadId,
        polarity: Polarity,
        delta: i64,
    ) -> RepoResult<()> {
        if self.faults.fail_counter_update.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(
                "injected counter update failure".to_string(),
            ));
        }
        let counters = self
            .working
            .threads
            .get_mut(&thread_id)
            .ok_or(DomainError::ThreadNotFound(thread_id))?;
        match polarity {
            Polarity::Like => counters.likes += delta,
            Polarity::Dislike => counters.dislikes += delta,
        }
        Ok(())
    }

    async fn record_change(&mut self, change: &ReactionChange) -> RepoResult<()> {
        self.working.changes.push(change.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
