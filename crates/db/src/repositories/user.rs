//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{profiles, users};

/// User repository for account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a user together with an empty profile row.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails; nothing is kept in that case.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let txn = self.db.begin().await?;

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        profiles::ActiveModel {
            user_id: Set(user.id),
            email: Set(user.email.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..empty_profile()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(user)
    }

    /// Replaces the password hash of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DbErr> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_string()),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

fn empty_profile() -> profiles::ActiveModel {
    use immoloc_core::profile::ProfileDetails;

    let details = ProfileDetails::default();
    profiles::ActiveModel {
        last_name: Set(details.last_name),
        first_name: Set(details.first_name),
        sex: Set(details.sex.as_str().to_string()),
        phone: Set(details.phone),
        address: Set(details.address),
        postal_code: Set(details.postal_code),
        holding_mode: Set(details.holding_mode.as_str().to_string()),
        rental_type: Set(details.rental_type.as_str().to_string()),
        activity_start_date: Set(details.activity_start_date),
        closing_date: Set(details.closing_date),
        siret: Set(details.siret),
        ..Default::default()
    }
}
