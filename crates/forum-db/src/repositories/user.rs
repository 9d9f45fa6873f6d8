//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::traits::{RepoResult, UserRepository};
use forum_core::{Credentials, DomainError, FederatedProfile, NewUser, User, UserId};

use crate::models::{CredentialsModel, UserModel};

use super::error::{map_db_error, map_unique_violation, user_not_found};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, provider, provider_subject, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)
            ",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: &NewUser) -> RepoResult<User> {
        let model = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, provider, provider_subject, created_at
            ",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameAlreadyExists))?;

        User::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_credentials(&self, username: &str) -> RepoResult<Option<Credentials>> {
        let result = sqlx::query_as::<_, CredentialsModel>(
            r"
            SELECT id, username, password_hash FROM users WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Credentials::from))
    }

    #[instrument(skip(self, profile), fields(provider = %profile.provider, subject = %profile.subject))]
    async fn upsert_federated(&self, profile: &FederatedProfile) -> RepoResult<User> {
        // The provider login can change; the subject is the stable key.
        let model = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (username, email, provider, provider_subject)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (provider, provider_subject) WHERE provider IS NOT NULL
            DO UPDATE SET username = EXCLUDED.username,
                          email = COALESCE(EXCLUDED.email, users.email)
            RETURNING id, username, email, provider, provider_subject, created_at
            ",
        )
        .bind(profile.username())
        .bind(&profile.email)
        .bind(profile.provider.as_str())
        .bind(&profile.subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameAlreadyExists))?;

        User::try_from(model)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Stored thread counters must keep matching the remaining records
        sqlx::query(
            r"
            UPDATE threads t
            SET likes = t.likes - s.likes, dislikes = t.dislikes - s.dislikes
            FROM (
                SELECT thread_id,
                       COUNT(*) FILTER (WHERE like_type = 1) AS likes,
                       COUNT(*) FILTER (WHERE like_type = -1) AS dislikes
                FROM thread_likes
                WHERE user_id = $1
                GROUP BY thread_id
            ) s
            WHERE t.id = s.thread_id
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)
    }
}
