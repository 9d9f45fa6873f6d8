//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub provider: Option<String>,
    pub provider_subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Login lookup row
#[derive(Clone, FromRow)]
pub struct CredentialsModel {
    pub id: i64,
    pub username: String,
    pub password_hash: Option<String>,
}
