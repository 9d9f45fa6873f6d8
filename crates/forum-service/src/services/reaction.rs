//! Reaction engine
//!
//! Every write runs as one store transaction: check the target, read the
//! caller's current reaction, write the record and, for threads, move the
//! stored counter. Nothing is committed unless every step succeeded, and
//! the whole unit of work is bounded by the configured store timeout.
//!
//! Both target kinds follow the same state machine per
//! `(target, user)`: `react` only goes from unset to set, and
//! `change_reaction` flips an existing polarity and writes an audit row.

use forum_core::traits::{ReactionTransaction, RepoResult};
use forum_core::{
    DomainError, Identity, Polarity, ReactionChange, ReactionKey, ReactionOutcome, ReactionRecord,
    ReactionTarget, TargetKind, ThreadId,
};
use tracing::{error, info, instrument, warn};

use crate::dto::{
    CommentTallyResponse, CurrentUserResponse, ProfileReactionsResponse, ReactionResponse,
    ThreadSummaryResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::identity::IdentityResolver;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a first reaction of `identity` on `target`.
    ///
    /// A second call for the same target fails with `ReactionAlreadyExists`
    /// and leaves counters and records untouched.
    #[instrument(skip(self, identity))]
    pub async fn react(
        &self,
        target: ReactionTarget,
        identity: &Identity,
        polarity: Polarity,
    ) -> ServiceResult<ReactionOutcome> {
        let user_id = IdentityResolver::require_non_guest(identity)?;
        let key = ReactionKey::new(target, user_id);

        let store = self.ctx.reaction_store();
        let outcome = self
            .ctx
            .bounded(async move {
                let mut tx = store.begin().await?;
                ensure_target(&mut *tx, target).await?;

                if tx.find_polarity(&key).await?.is_some() {
                    return Err(DomainError::ReactionAlreadyExists(target.kind()));
                }

                tx.insert_reaction(&ReactionRecord::new(key, polarity)).await?;
                if let ReactionTarget::Thread(thread_id) = target {
                    tx.adjust_thread_counter(thread_id, polarity, 1).await?;
                }

                tx.commit().await?;
                Ok(ReactionOutcome::Recorded { polarity })
            })
            .await;

        self.log_outcome(&key, outcome)
    }

    /// Flip an existing reaction to `polarity`.
    ///
    /// Fails with `NotReacted` when there is nothing to change. Asking for
    /// the polarity already stored is a no-op.
    #[instrument(skip(self, identity))]
    pub async fn change_reaction(
        &self,
        target: ReactionTarget,
        identity: &Identity,
        polarity: Polarity,
    ) -> ServiceResult<ReactionOutcome> {
        let user_id = IdentityResolver::require_non_guest(identity)?;
        let key = ReactionKey::new(target, user_id);

        let store = self.ctx.reaction_store();
        let outcome = self
            .ctx
            .bounded(async move {
                let mut tx = store.begin().await?;
                ensure_target(&mut *tx, target).await?;

                let current = tx
                    .find_polarity(&key)
                    .await?
                    .ok_or(DomainError::NotReacted(target.kind()))?;

                if current == polarity {
                    return Ok(ReactionOutcome::Unchanged { polarity });
                }

                tx.update_polarity(&key, polarity).await?;
                if let ReactionTarget::Thread(thread_id) = target {
                    tx.adjust_thread_counter(thread_id, current, -1).await?;
                    tx.adjust_thread_counter(thread_id, polarity, 1).await?;
                }
                tx.record_change(&ReactionChange::new(key, current, polarity))
                    .await?;

                tx.commit().await?;
                Ok(ReactionOutcome::Changed {
                    from: current,
                    to: polarity,
                })
            })
            .await;

        self.log_outcome(&key, outcome)
    }

    /// Counters of a thread, tallies of its comments and what the viewer
    /// reacted with. Readable by guests.
    #[instrument(skip(self, viewer))]
    pub async fn thread_summary(
        &self,
        thread_id: ThreadId,
        viewer: &Identity,
    ) -> ServiceResult<ThreadSummaryResponse> {
        let store = self.ctx.reaction_store();
        let viewer_id = viewer.user_id();

        let (counters, comments, own) = self
            .ctx
            .bounded(async move {
                let counters = store
                    .thread_counters(thread_id)
                    .await?
                    .ok_or(DomainError::ThreadNotFound(thread_id))?;
                let comments = store.comment_tallies(thread_id).await?;
                let own = match viewer_id {
                    Some(user_id) => store.find_in_thread(thread_id, user_id).await?,
                    None => Vec::new(),
                };
                Ok((counters, comments, own))
            })
            .await?;

        Ok(ThreadSummaryResponse {
            thread_id: thread_id.into_inner(),
            likes: counters.likes,
            dislikes: counters.dislikes,
            comments: comments.into_iter().map(CommentTallyResponse::from).collect(),
            viewer: CurrentUserResponse::from(viewer),
            viewer_reactions: own.iter().map(ReactionResponse::from).collect(),
        })
    }

    /// Threads and comments the caller liked or disliked
    #[instrument(skip(self, identity))]
    pub async fn user_reactions(&self, identity: &Identity) -> ServiceResult<ProfileReactionsResponse> {
        let user_id = IdentityResolver::require_non_guest(identity)?;
        let store = self.ctx.reaction_store();
        let records = self.ctx.bounded(store.find_by_user(user_id)).await?;

        let mut profile = ProfileReactionsResponse {
            username: identity.display_name.clone(),
            ..ProfileReactionsResponse::default()
        };
        for record in &records {
            let id = record.target.raw_id();
            let bucket = match (record.target.kind(), record.polarity) {
                (TargetKind::Thread, Polarity::Like) => &mut profile.liked_threads,
                (TargetKind::Thread, Polarity::Dislike) => &mut profile.disliked_threads,
                (TargetKind::Comment, Polarity::Like) => &mut profile.liked_comments,
                (TargetKind::Comment, Polarity::Dislike) => &mut profile.disliked_comments,
            };
            bucket.push(id);
        }

        Ok(profile)
    }

    fn log_outcome(
        &self,
        key: &ReactionKey,
        outcome: ServiceResult<ReactionOutcome>,
    ) -> ServiceResult<ReactionOutcome> {
        match &outcome {
            Ok(o) => info!(user_id = %key.user_id, outcome = ?o, "Reaction applied"),
            Err(e) if e.is_storage() => {
                error!(user_id = %key.user_id, error = %e, "Reaction rolled back");
            }
            Err(e) => warn!(user_id = %key.user_id, code = e.error_code(), "Reaction rejected"),
        }
        outcome
    }
}

async fn ensure_target(tx: &mut dyn ReactionTransaction, target: ReactionTarget) -> RepoResult<()> {
    if tx.target_exists(target).await? {
        return Ok(());
    }
    Err(match target {
        ReactionTarget::Thread(id) => DomainError::ThreadNotFound(id),
        ReactionTarget::Comment(id) => DomainError::CommentNotFound(id),
    })
}
