//! Profile repository for database operations.

use chrono::Utc;
use immoloc_core::profile::{
    HoldingMode, Profile, ProfileDetails, ProfileError, ProfileRepository as ProfileRepoTrait,
    RentalType, Sex,
};
use immoloc_shared::types::UserId;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use super::{decode, utc};
use crate::entities::profiles;

/// Profile repository implementation.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ProfileRepoTrait for ProfileRepository {
    async fn find(&self, user_id: UserId) -> Result<Option<Profile>, ProfileError> {
        profiles::Entity::find_by_id(user_id.into_inner())
            .one(&self.db)
            .await
            .and_then(|model| model.map(to_domain).transpose())
            .map_err(|e| ProfileError::repository(e.to_string()))
    }

    async fn update(
        &self,
        user_id: UserId,
        details: ProfileDetails,
    ) -> Result<Option<Profile>, ProfileError> {
        let Some(existing) = profiles::Entity::find_by_id(user_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| ProfileError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut active: profiles::ActiveModel = existing.into();
        active.last_name = Set(details.last_name);
        active.first_name = Set(details.first_name);
        active.sex = Set(details.sex.as_str().to_string());
        active.phone = Set(details.phone);
        active.address = Set(details.address);
        active.postal_code = Set(details.postal_code);
        active.holding_mode = Set(details.holding_mode.as_str().to_string());
        active.rental_type = Set(details.rental_type.as_str().to_string());
        active.activity_start_date = Set(details.activity_start_date);
        active.closing_date = Set(details.closing_date);
        active.siret = Set(details.siret);
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .and_then(to_domain)
            .map(Some)
            .map_err(|e| ProfileError::repository(e.to_string()))
    }
}

/// Convert database model to domain profile.
fn to_domain(model: profiles::Model) -> Result<Profile, DbErr> {
    let details = ProfileDetails {
        sex: decode(Sex::parse(&model.sex), "sex", &model.sex)?,
        holding_mode: decode(
            HoldingMode::parse(&model.holding_mode),
            "holding_mode",
            &model.holding_mode,
        )?,
        rental_type: decode(
            RentalType::parse(&model.rental_type),
            "rental_type",
            &model.rental_type,
        )?,
        last_name: model.last_name,
        first_name: model.first_name,
        phone: model.phone,
        address: model.address,
        postal_code: model.postal_code,
        activity_start_date: model.activity_start_date,
        closing_date: model.closing_date,
        siret: model.siret,
    };

    Ok(Profile {
        user_id: model.user_id.into(),
        email: model.email,
        details,
        updated_at: utc(model.updated_at),
    })
}
