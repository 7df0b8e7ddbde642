//! Session repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, sea_query::Expr,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::sessions;

/// Session repository for refresh tokens and revocation.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a refresh token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Creates a session under a caller-chosen ID.
    ///
    /// The ID is chosen up front because the tokens embed it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        id: Uuid,
        user_id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<sessions::Model, DbErr> {
        let now = Utc::now().into();

        sessions::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            refresh_token_hash: Set(Self::hash_token(refresh_token)),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a live session by refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(Self::hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Returns true if the session exists, is not revoked and has not expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_active(&self, id: Uuid) -> Result<bool, DbErr> {
        let count = sessions::Entity::find_by_id(id)
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Replaces the refresh token of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn rotate(
        &self,
        id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        sessions::ActiveModel {
            id: Set(id),
            refresh_token_hash: Set(Self::hash_token(refresh_token)),
            expires_at: Set(expires_at.into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }

    /// Revokes a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, id: Uuid) -> Result<(), DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(now))
            .col_expr(sessions::Column::UpdatedAt, Expr::value(now))
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Revokes every live session of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_all_user_sessions(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(now))
            .col_expr(sessions::Column::UpdatedAt, Expr::value(now))
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = SessionRepository::hash_token("refresh-token");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, SessionRepository::hash_token("refresh-token"));
        assert_ne!(hash, SessionRepository::hash_token("other-token"));
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
