//! Intake wizard that precedes opening a ledger.
//!
//! Each variant carries exactly what has been collected so far, so going back a
//! step drops everything gathered at and after it.

use immoloc_shared::types::BilanId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Bilan;

/// Instructions the owner must acknowledge at step 4, without the deadline line.
pub const INSTRUCTIONS: [&str; 6] = [
    "Munissez-vous de vos comptes bancaires où passent vos opérations liées à votre location meublée pour remplir ce tableau ainsi que les documents / factures associés.",
    "Vous n'avez pas à saisir les frais de notaires.",
    "Vos déblocages d'emprunt ne sont pas à renseigner.",
    "Les échéances d'emprunt ne sont pas à séparer entre intérêts, assurance et capital amorti.",
    "Ne pas réaliser de calculs globaux.",
    "Si vous faites de la location courte durée type, airbnb, booking, contacter votre comptable, des spécificités sont à prendre en compte.",
];

/// Full instruction list for a fiscal year, deadline included.
#[must_use]
pub fn instructions(fiscal_year: i32) -> Vec<String> {
    INSTRUCTIONS
        .iter()
        .map(|line| (*line).to_string())
        .chain(std::iter::once(format!(
            "La date limite pour déposer le bilan est le 15 janvier {}",
            fiscal_year + 1
        )))
        .collect()
}

/// New main residence given at step 2.
///
/// Kept in the wizard only; it is not written to the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAddress {
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
}

/// Wizard transition errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// Action does not apply to the current step.
    #[error("Action « {action} » impossible à l'étape « {step} »")]
    InvalidTransition {
        /// Current step.
        step: &'static str,
        /// Attempted action.
        action: &'static str,
    },

    /// Year not in the selectable set.
    #[error("L'année {0} n'est pas disponible")]
    YearUnavailable(i32),

    /// Every year of the window already has a ledger.
    #[error("Aucune année disponible : consultez vos archives")]
    NoYearAvailable,

    /// Continue pressed before choosing a year.
    #[error("Veuillez sélectionner une année")]
    NoYearSelected,

    /// Continue pressed before ticking the acknowledgement.
    #[error("Veuillez accepter les consignes avant de continuer")]
    InstructionsNotAccepted,
}

impl WizardError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_WIZARD_TRANSITION",
            Self::YearUnavailable(_) => "YEAR_UNAVAILABLE",
            Self::NoYearAvailable => "NO_YEAR_AVAILABLE",
            Self::NoYearSelected => "NO_YEAR_SELECTED",
            Self::InstructionsNotAccepted => "INSTRUCTIONS_NOT_ACCEPTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 409,
            Self::YearUnavailable(_)
            | Self::NoYearAvailable
            | Self::NoYearSelected
            | Self::InstructionsNotAccepted => 422,
        }
    }
}

/// Where the owner stands between "no ledger" and "ledger finalized".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardState {
    /// No open ledger.
    #[default]
    NoLedger,
    /// Step 1: "new property acquired this year?"
    NewProperty {
        /// Owner answered yes and is creating the property.
        creating_property: bool,
    },
    /// Step 2: "did you move?"
    Moved {
        /// Answer to step 1.
        acquired_property: bool,
    },
    /// Step 3: choose the fiscal year.
    FiscalYear {
        /// Answer to step 1.
        acquired_property: bool,
        /// Answer to step 2.
        new_address: Option<MoveAddress>,
        /// Years still free, newest first.
        available_years: Vec<i32>,
        /// Current choice.
        selected_year: Option<i32>,
    },
    /// Step 4: acknowledge the instructions.
    Instructions {
        /// Answer to step 1.
        acquired_property: bool,
        /// Answer to step 2.
        new_address: Option<MoveAddress>,
        /// Years offered at step 3, kept for going back.
        available_years: Vec<i32>,
        /// Chosen year.
        year: i32,
        /// Acknowledgement checkbox.
        accepted: bool,
    },
    /// A ledger is open for editing.
    LedgerOpen {
        /// Ledger.
        bilan_id: BilanId,
        /// Fiscal year.
        year: i32,
    },
    /// The ledger was just finalized.
    LedgerFinalized {
        /// Ledger.
        bilan_id: BilanId,
        /// Fiscal year.
        year: i32,
    },
}

impl WizardState {
    /// State matching what is stored: the open ledger if any, else no ledger.
    #[must_use]
    pub fn from_open_ledger(open: Option<&Bilan>) -> Self {
        match open {
            Some(bilan) if bilan.is_open() => Self::LedgerOpen {
                bilan_id: bilan.id,
                year: bilan.year,
            },
            _ => Self::NoLedger,
        }
    }

    /// Name of the current step.
    #[must_use]
    pub const fn step(&self) -> &'static str {
        match self {
            Self::NoLedger => "no_ledger",
            Self::NewProperty { .. } => "new_property",
            Self::Moved { .. } => "moved",
            Self::FiscalYear { .. } => "fiscal_year",
            Self::Instructions { .. } => "instructions",
            Self::LedgerOpen { .. } => "ledger_open",
            Self::LedgerFinalized { .. } => "ledger_finalized",
        }
    }

    /// Wizard step number, 1 to 4, or `None` outside the wizard.
    #[must_use]
    pub const fn step_number(&self) -> Option<u8> {
        match self {
            Self::NewProperty { .. } => Some(1),
            Self::Moved { .. } => Some(2),
            Self::FiscalYear { .. } => Some(3),
            Self::Instructions { .. } => Some(4),
            Self::NoLedger | Self::LedgerOpen { .. } | Self::LedgerFinalized { .. } => None,
        }
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            step: self.step(),
            action,
        }
    }

    /// Starts the wizard.
    ///
    /// # Errors
    ///
    /// Fails unless there is no ledger.
    pub fn start(self) -> Result<Self, WizardError> {
        match self {
            Self::NoLedger => Ok(Self::NewProperty {
                creating_property: false,
            }),
            other => Err(other.invalid("start")),
        }
    }

    /// Answers step 1. Yes suspends the wizard while the property is created.
    ///
    /// # Errors
    ///
    /// Fails outside step 1 or while a property is being created.
    pub fn answer_new_property(self, acquired: bool) -> Result<Self, WizardError> {
        match self {
            Self::NewProperty {
                creating_property: false,
            } => Ok(if acquired {
                Self::NewProperty {
                    creating_property: true,
                }
            } else {
                Self::Moved {
                    acquired_property: false,
                }
            }),
            other => Err(other.invalid("answer_new_property")),
        }
    }

    /// Resumes at step 2 once the new property exists.
    ///
    /// # Errors
    ///
    /// Fails unless a property creation was pending.
    pub fn property_created(self) -> Result<Self, WizardError> {
        match self {
            Self::NewProperty {
                creating_property: true,
            } => Ok(Self::Moved {
                acquired_property: true,
            }),
            other => Err(other.invalid("property_created")),
        }
    }

    /// Abandons the pending property creation and asks step 1 again.
    ///
    /// # Errors
    ///
    /// Fails unless a property creation was pending.
    pub fn cancel_property_creation(self) -> Result<Self, WizardError> {
        match self {
            Self::NewProperty {
                creating_property: true,
            } => Ok(Self::NewProperty {
                creating_property: false,
            }),
            other => Err(other.invalid("cancel_property_creation")),
        }
    }

    /// Answers step 2 and moves to year selection with the years still free.
    ///
    /// # Errors
    ///
    /// Fails outside step 2.
    pub fn answer_moved(
        self,
        new_address: Option<MoveAddress>,
        available_years: Vec<i32>,
    ) -> Result<Self, WizardError> {
        match self {
            Self::Moved { acquired_property } => Ok(Self::FiscalYear {
                acquired_property,
                new_address,
                available_years,
                selected_year: None,
            }),
            other => Err(other.invalid("answer_moved")),
        }
    }

    /// Chooses a fiscal year at step 3.
    ///
    /// # Errors
    ///
    /// Fails outside step 3 or for a year not offered.
    pub fn select_year(self, year: i32) -> Result<Self, WizardError> {
        match self {
            Self::FiscalYear {
                acquired_property,
                new_address,
                available_years,
                ..
            } => {
                if !available_years.contains(&year) {
                    return Err(WizardError::YearUnavailable(year));
                }
                Ok(Self::FiscalYear {
                    acquired_property,
                    new_address,
                    available_years,
                    selected_year: Some(year),
                })
            }
            other => Err(other.invalid("select_year")),
        }
    }

    /// Leaves step 3 for the instructions.
    ///
    /// # Errors
    ///
    /// Fails outside step 3, when no year is free, or when none is selected.
    pub fn confirm_year(self) -> Result<Self, WizardError> {
        match self {
            Self::FiscalYear {
                available_years, ..
            } if available_years.is_empty() => Err(WizardError::NoYearAvailable),
            Self::FiscalYear {
                selected_year: None,
                ..
            } => Err(WizardError::NoYearSelected),
            Self::FiscalYear {
                acquired_property,
                new_address,
                available_years,
                selected_year: Some(year),
            } => Ok(Self::Instructions {
                acquired_property,
                new_address,
                available_years,
                year,
                accepted: false,
            }),
            other => Err(other.invalid("confirm_year")),
        }
    }

    /// Ticks or unticks the acknowledgement at step 4.
    ///
    /// # Errors
    ///
    /// Fails outside step 4.
    pub fn set_accepted(self, accepted: bool) -> Result<Self, WizardError> {
        match self {
            Self::Instructions {
                acquired_property,
                new_address,
                available_years,
                year,
                ..
            } => Ok(Self::Instructions {
                acquired_property,
                new_address,
                available_years,
                year,
                accepted,
            }),
            other => Err(other.invalid("set_accepted")),
        }
    }

    /// Year the ledger should be created for, once step 4 is acknowledged.
    ///
    /// # Errors
    ///
    /// Fails outside step 4 or before acknowledgement.
    pub fn year_to_open(&self) -> Result<i32, WizardError> {
        match self {
            Self::Instructions {
                year,
                accepted: true,
                ..
            } => Ok(*year),
            Self::Instructions {
                accepted: false, ..
            } => Err(WizardError::InstructionsNotAccepted),
            other => Err(other.invalid("open_ledger")),
        }
    }

    /// Records that the ledger was created.
    ///
    /// # Errors
    ///
    /// Fails unless step 4 is acknowledged.
    pub fn ledger_opened(self, bilan: &Bilan) -> Result<Self, WizardError> {
        self.year_to_open()?;
        Ok(Self::LedgerOpen {
            bilan_id: bilan.id,
            year: bilan.year,
        })
    }

    /// Records that the open ledger was finalized.
    ///
    /// # Errors
    ///
    /// Fails unless a ledger is open.
    pub fn ledger_finalized(self) -> Result<Self, WizardError> {
        match self {
            Self::LedgerOpen { bilan_id, year } => Ok(Self::LedgerFinalized { bilan_id, year }),
            other => Err(other.invalid("finalize")),
        }
    }

    /// Dismisses the finalization notice; a new ledger can be started.
    ///
    /// # Errors
    ///
    /// Fails unless a ledger was just finalized.
    pub fn acknowledge(self) -> Result<Self, WizardError> {
        match self {
            Self::LedgerFinalized { .. } => Ok(Self::NoLedger),
            other => Err(other.invalid("acknowledge")),
        }
    }

    /// Goes back one step, discarding what was collected at the step left.
    ///
    /// # Errors
    ///
    /// Fails outside the four wizard steps.
    pub fn back(self) -> Result<Self, WizardError> {
        match self {
            Self::NewProperty { .. } => Ok(Self::NoLedger),
            Self::Moved { .. } => Ok(Self::NewProperty {
                creating_property: false,
            }),
            Self::FiscalYear {
                acquired_property, ..
            } => Ok(Self::Moved { acquired_property }),
            Self::Instructions {
                acquired_property,
                new_address,
                available_years,
                ..
            } => Ok(Self::FiscalYear {
                acquired_property,
                new_address,
                available_years,
                selected_year: None,
            }),
            other => Err(other.invalid("back")),
        }
    }

    /// Abandons the wizard.
    ///
    /// # Errors
    ///
    /// Fails once a ledger is open.
    pub fn cancel(self) -> Result<Self, WizardError> {
        match self {
            Self::NoLedger
            | Self::NewProperty { .. }
            | Self::Moved { .. }
            | Self::FiscalYear { .. }
            | Self::Instructions { .. } => Ok(Self::NoLedger),
            other => Err(other.invalid("cancel")),
        }
    }
}
