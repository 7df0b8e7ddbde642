//! Profile service.

use std::future::Future;
use std::sync::Arc;

use immoloc_shared::types::UserId;
use thiserror::Error;
use tracing::info;

use super::types::{Profile, ProfileDetails};
use crate::session::Session;

/// Profile operation errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A required field is empty.
    #[error("{0}")]
    Required(&'static str),

    /// No profile row for the account.
    #[error("Profil introuvable")]
    NotFound,

    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ProfileError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Required(_) => "VALIDATION_ERROR",
            Self::NotFound => "PROFILE_NOT_FOUND",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Required(_) => 400,
            Self::NotFound => 404,
            Self::Repository(_) => 500,
        }
    }
}

/// Repository trait for profile persistence.
pub trait ProfileRepository: Send + Sync {
    /// Profile of an account.
    fn find(&self, user_id: UserId)
    -> impl Future<Output = Result<Option<Profile>, ProfileError>> + Send;

    /// Overwrite the details. `None` if there is no profile row.
    fn update(
        &self,
        user_id: UserId,
        details: ProfileDetails,
    ) -> impl Future<Output = Result<Option<Profile>, ProfileError>> + Send;
}

/// Profile service.
pub struct ProfileService<R: ProfileRepository> {
    repo: Arc<R>,
}

impl<R: ProfileRepository> ProfileService<R> {
    /// Create a new profile service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The signed-in owner's profile.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NotFound` if the row is missing.
    pub async fn get(&self, session: &Session) -> Result<Profile, ProfileError> {
        self.repo
            .find(session.user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// Validate and save the owner's details.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Required` for the first empty required field.
    pub async fn update(
        &self,
        session: &Session,
        details: ProfileDetails,
    ) -> Result<Profile, ProfileError> {
        details.validate()?;
        let profile = self
            .repo
            .update(session.user_id, details)
            .await?
            .ok_or(ProfileError::NotFound)?;
        info!(user_id = %session.user_id, "Profile updated");
        Ok(profile)
    }
}
