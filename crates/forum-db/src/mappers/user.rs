//! User model -> entity mapper

use forum_core::{Credentials, DomainError, IdentityProvider, User, UserId};

use crate::models::{CredentialsModel, UserModel};

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let provider = model
            .provider
            .as_deref()
            .map(str::parse::<IdentityProvider>)
            .transpose()
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: UserId::new(model.id),
            username: model.username,
            email: model.email,
            provider,
            provider_subject: model.provider_subject,
            created_at: model.created_at,
        })
    }
}

impl From<CredentialsModel> for Credentials {
    fn from(model: CredentialsModel) -> Self {
        Credentials {
            user_id: UserId::new(model.id),
            username: model.username,
            password_hash: model.password_hash,
        }
    }
}
