//! PostgreSQL implementation of the reaction store
//!
//! Exactly-once reactions rest on the primary keys of `thread_likes` and
//! `comment_likes`: a concurrent duplicate insert fails with a unique
//! violation, which is reported as `ReactionAlreadyExists`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use forum_core::traits::{ReactionStore, ReactionTransaction, RepoResult};
use forum_core::{
    CommentId, DomainError, Polarity, ReactionChange, ReactionKey, ReactionRecord, ReactionTally,
    ReactionTarget, ThreadId, UserId,
};

use crate::models::{CommentTallyModel, ReactionModel, TallyModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionStore
#[derive(Clone)]
pub struct PgReactionStore {
    pool: PgPool,
}

impl PgReactionStore {
    /// Create a new PgReactionStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn ReactionTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgReactionTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn thread_counters(&self, thread_id: ThreadId) -> RepoResult<Option<ReactionTally>> {
        let result = sqlx::query_as::<_, TallyModel>(
            r"
            SELECT likes, dislikes FROM threads WHERE id = $1
            ",
        )
        .bind(thread_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReactionTally::from))
    }

    #[instrument(skip(self))]
    async fn aggregate(&self, target: ReactionTarget) -> RepoResult<ReactionTally> {
        let sql = match target {
            ReactionTarget::Thread(_) => {
                r"
                SELECT COUNT(*) FILTER (WHERE like_type = 1) AS likes,
                       COUNT(*) FILTER (WHERE like_type = -1) AS dislikes
                FROM thread_likes
                WHERE thread_id = $1
                "
            }
            ReactionTarget::Comment(_) => {
                r"
                SELECT COUNT(*) FILTER (WHERE like_type = 1) AS likes,
                       COUNT(*) FILTER (WHERE like_type = -1) AS dislikes
                FROM comment_likes
                WHERE comment_id = $1
                "
            }
        };

        let tally = sqlx::query_as::<_, TallyModel>(sql)
            .bind(target.raw_id())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(tally.into())
    }

    #[instrument(skip(self))]
    async fn comment_tallies(
        &self,
        thread_id: ThreadId,
    ) -> RepoResult<Vec<(CommentId, ReactionTally)>> {
        let rows = sqlx::query_as::<_, CommentTallyModel>(
            r"
            SELECT c.id AS comment_id,
                   COUNT(cl.user_id) FILTER (WHERE cl.like_type = 1) AS likes,
                   COUNT(cl.user_id) FILTER (WHERE cl.like_type = -1) AS dislikes
            FROM comments c
            LEFT JOIN comment_likes cl ON cl.comment_id = c.id
            WHERE c.thread_id = $1
            GROUP BY c.id
            ORDER BY c.id
            ",
        )
        .bind(thread_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    CommentId::new(row.comment_id),
                    ReactionTally::new(row.likes, row.dislikes),
                )
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn find(&self, key: &ReactionKey) -> RepoResult<Option<ReactionRecord>> {
        let sql = match key.target {
            ReactionTarget::Thread(_) => {
                r"
                SELECT 'thread' AS target_kind, thread_id AS target_id, user_id, like_type, created_at
                FROM thread_likes
                WHERE thread_id = $1 AND user_id = $2
                "
            }
            ReactionTarget::Comment(_) => {
                r"
                SELECT 'comment' AS target_kind, comment_id AS target_id, user_id, like_type, created_at
                FROM comment_likes
                WHERE comment_id = $1 AND user_id = $2
                "
            }
        };

        let result = sqlx::query_as::<_, ReactionModel>(sql)
            .bind(key.target.raw_id())
            .bind(key.user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_in_thread(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
    ) -> RepoResult<Vec<ReactionRecord>> {
        let rows = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT 'thread' AS target_kind, thread_id AS target_id, user_id, like_type, created_at
            FROM thread_likes
            WHERE thread_id = $1 AND user_id = $2
            UNION ALL
            SELECT 'comment' AS target_kind, cl.comment_id AS target_id, cl.user_id, cl.like_type, cl.created_at
            FROM comment_likes cl
            JOIN comments c ON c.id = cl.comment_id
            WHERE c.thread_id = $1 AND cl.user_id = $2
            ",
        )
        .bind(thread_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ReactionRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<ReactionRecord>> {
        let rows = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT 'thread' AS target_kind, thread_id AS target_id, user_id, like_type, created_at
            FROM thread_likes
            WHERE user_id = $1
            UNION ALL
            SELECT 'comment' AS target_kind, comment_id AS target_id, user_id, like_type, created_at
            FROM comment_likes
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ReactionRecord::try_from).collect()
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_db_error)
    }
}

/// One open Postgres transaction. Dropping it without `commit` rolls back.
pub struct PgReactionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReactionTransaction for PgReactionTransaction {
    async fn target_exists(&mut self, target: ReactionTarget) -> RepoResult<bool> {
        let sql = match target {
            ReactionTarget::Thread(_) => "SELECT EXISTS(SELECT 1 FROM threads WHERE id = $1)",
            ReactionTarget::Comment(_) => "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)",
        };

        sqlx::query_scalar::<_, bool>(sql)
            .bind(target.raw_id())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn find_polarity(&mut self, key: &ReactionKey) -> RepoResult<Option<Polarity>> {
        let sql = match key.target {
            ReactionTarget::Thread(_) => {
                "SELECT like_type FROM thread_likes WHERE thread_id = $1 AND user_id = $2 FOR UPDATE"
            }
            ReactionTarget::Comment(_) => {
                "SELECT like_type FROM comment_likes WHERE comment_id = $1 AND user_id = $2 FOR UPDATE"
            }
        };

        let value = sqlx::query_scalar::<_, i16>(sql)
            .bind(key.target.raw_id())
            .bind(key.user_id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        value
            .map(|v| Polarity::try_from(v).map_err(|e| DomainError::DatabaseError(e.to_string())))
            .transpose()
    }

    async fn insert_reaction(&mut self, record: &ReactionRecord) -> RepoResult<()> {
        let sql = match record.target {
            ReactionTarget::Thread(_) => {
                "INSERT INTO thread_likes (thread_id, user_id, like_type, created_at) VALUES ($1, $2, $3, $4)"
            }
            ReactionTarget::Comment(_) => {
                "INSERT INTO comment_likes (comment_id, user_id, like_type, created_at) VALUES ($1, $2, $3, $4)"
            }
        };
        let kind = record.target.kind();

        sqlx::query(sql)
            .bind(record.target.raw_id())
            .bind(record.user_id.into_inner())
            .bind(record.polarity.value())
            .bind(record.created_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists(kind)))?;

        Ok(())
    }

    async fn update_polarity(&mut self, key: &ReactionKey, polarity: Polarity) -> RepoResult<()> {
        let sql = match key.target {
            ReactionTarget::Thread(_) => {
                "UPDATE thread_likes SET like_type = $3 WHERE thread_id = $1 AND user_id = $2"
            }
            ReactionTarget::Comment(_) => {
                "UPDATE comment_likes SET like_type = $3 WHERE comment_id = $1 AND user_id = $2"
            }
        };

        let result = sqlx::query(sql)
            .bind(key.target.raw_id())
            .bind(key.user_id.into_inner())
            .bind(polarity.value())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotReacted(key.target.kind()));
        }
        Ok(())
    }

    async fn adjust_thread_counter(
        &mut self,
        thread_id: ThreadId,
        polarity: Polarity,
        delta: i64,
    ) -> RepoResult<()> {
        let sql = match polarity {
            Polarity::Like => "UPDATE threads SET likes = likes + $2 WHERE id = $1",
            Polarity::Dislike => "UPDATE threads SET dislikes = dislikes + $2 WHERE id = $1",
        };

        let result = sqlx::query(sql)
            .bind(thread_id.into_inner())
            .bind(delta)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ThreadNotFound(thread_id));
        }
        Ok(())
    }

    async fn record_change(&mut self, change: &ReactionChange) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reaction_changes (target_kind, target_id, user_id, from_type, to_type, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(change.target.kind().as_str())
        .bind(change.target.raw_id())
        .bind(change.user_id.into_inner())
        .bind(change.from.value())
        .bind(change.to.value())
        .bind(change.changed_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
