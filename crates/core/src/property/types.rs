//! Property types.

use chrono::{DateTime, NaiveDate, Utc};
use immoloc_shared::types::{PropertyId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PropertyError;
use super::vocabulary::{AcquisitionType, PropertyType, TenureRight, VatRegime, YesNo};

/// A rental property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property ID.
    pub id: PropertyId,
    /// Owner.
    pub user_id: UserId,
    /// Display name (dénomination).
    pub name: String,
    /// Kind of building.
    pub property_type: PropertyType,
    /// Ownership right.
    pub tenure_right: TenureRight,
    /// VAT regime.
    pub vat_regime: VatRegime,
    /// Surface in m².
    pub surface: Option<Decimal>,
    /// Partly used by the owner.
    pub personal_use: YesNo,
    /// How it was obtained.
    pub acquisition_type: AcquisitionType,
    /// Acquisition date.
    pub acquisition_date: Option<NaiveDate>,
    /// First day of rental.
    pub rental_start_date: Option<NaiveDate>,
    /// Financed by a loan.
    pub loan: YesNo,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Property form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyInput {
    /// Display name. Required, trimmed.
    pub name: String,
    /// Kind of building.
    pub property_type: PropertyType,
    /// Ownership right.
    pub tenure_right: TenureRight,
    /// VAT regime.
    pub vat_regime: VatRegime,
    /// Surface in m².
    pub surface: Option<Decimal>,
    /// Partly used by the owner.
    pub personal_use: YesNo,
    /// How it was obtained.
    pub acquisition_type: AcquisitionType,
    /// Acquisition date.
    pub acquisition_date: Option<NaiveDate>,
    /// First day of rental.
    pub rental_start_date: Option<NaiveDate>,
    /// Financed by a loan.
    pub loan: YesNo,
}

impl PropertyInput {
    /// Trims the name and checks it is present.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError::NameRequired` for a blank name.
    pub fn validated(mut self) -> Result<Self, PropertyError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(PropertyError::NameRequired);
        }
        self.name = trimmed.to_string();
        Ok(self)
    }
}

/// List order of properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOrder {
    /// Newest first (property screen).
    #[default]
    Newest,
    /// Alphabetical (ledger selector).
    Name,
}
