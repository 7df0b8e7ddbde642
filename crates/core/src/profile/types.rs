//! Profile types.

use chrono::{DateTime, NaiveDate, Utc};
use immoloc_shared::types::UserId;
use serde::{Deserialize, Serialize};

use super::service::ProfileError;
use crate::vocabulary::vocabulary;

vocabulary! {
    /// Civil sex.
    Sex {
        Male => "Masculin",
        Female => "Féminin",
    }
}

vocabulary! {
    /// How the properties are held.
    HoldingMode {
        Joint => "Indivision",
        Personal => "Nom propre",
    }
}

vocabulary! {
    /// Kind of rental activity.
    RentalType {
        LongTerm => "Longue durée",
        ShortTerm => "Courte durée",
        Mixed => "Mixte",
    }
}

/// Default accounting closing date.
pub const DEFAULT_CLOSING_DATE: &str = "31/12";

fn default_closing_date() -> String {
    DEFAULT_CLOSING_DATE.to_string()
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetails {
    /// Last name. Required.
    pub last_name: String,
    /// First name. Required.
    pub first_name: String,
    /// Sex.
    pub sex: Sex,
    /// Phone number.
    pub phone: String,
    /// Postal address. Required.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// Holding mode.
    pub holding_mode: HoldingMode,
    /// Rental type.
    pub rental_type: RentalType,
    /// Start of the rental activity. Required.
    pub activity_start_date: Option<NaiveDate>,
    /// Accounting closing date, `dd/mm`.
    pub closing_date: String,
    /// SIRET number. Required.
    pub siret: String,
}

impl Default for ProfileDetails {
    fn default() -> Self {
        Self {
            last_name: String::new(),
            first_name: String::new(),
            sex: Sex::default(),
            phone: String::new(),
            address: String::new(),
            postal_code: String::new(),
            holding_mode: HoldingMode::default(),
            rental_type: RentalType::default(),
            activity_start_date: None,
            closing_date: default_closing_date(),
            siret: String::new(),
        }
    }
}

impl ProfileDetails {
    /// Checks required fields in form order.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Required` naming the first missing field.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let required = [
            (self.last_name.trim().is_empty(), "Le nom est obligatoire"),
            (self.first_name.trim().is_empty(), "Le prénom est obligatoire"),
            (self.address.trim().is_empty(), "L'adresse est obligatoire"),
            (
                self.activity_start_date.is_none(),
                "La date de début d'activité est obligatoire",
            ),
            (self.siret.trim().is_empty(), "Le numéro SIRET est obligatoire"),
        ];
        match required.iter().find(|(missing, _)| *missing) {
            Some(&(_, message)) => Err(ProfileError::Required(message)),
            None => Ok(()),
        }
    }
}

/// An owner's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Owner.
    pub user_id: UserId,
    /// Account email.
    pub email: String,
    /// Details.
    #[serde(flatten)]
    pub details: ProfileDetails,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ProfileDetails {
        ProfileDetails {
            last_name: "Martin".to_string(),
            first_name: "Claire".to_string(),
            address: "3 rue des Lilas".to_string(),
            activity_start_date: NaiveDate::from_ymd_opt(2021, 6, 1),
            siret: "12345678900011".to_string(),
            ..ProfileDetails::default()
        }
    }

    #[test]
    fn test_defaults() {
        let details = ProfileDetails::default();
        assert_eq!(details.holding_mode.as_str(), "Indivision");
        assert_eq!(details.rental_type.as_str(), "Longue durée");
        assert_eq!(details.closing_date, "31/12");
    }

    #[test]
    fn test_complete_profile_is_valid() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let details = ProfileDetails {
            first_name: " ".to_string(),
            siret: String::new(),
            ..complete()
        };
        let err = details.validate().unwrap_err();
        assert_eq!(err.to_string(), "Le prénom est obligatoire");
    }

    #[test]
    fn test_activity_start_required() {
        let details = ProfileDetails {
            activity_start_date: None,
            ..complete()
        };
        assert!(matches!(details.validate(), Err(ProfileError::Required(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let details: ProfileDetails = serde_json::from_str(r#"{"last_name":"Martin"}"#).unwrap();
        assert_eq!(details.last_name, "Martin");
        assert_eq!(details.closing_date, "31/12");
        assert_eq!(details.sex, Sex::Male);
    }
}
