//! Yearly ledger ("bilan") lifecycle.
//!
//! - `wizard` - the four intake steps before a ledger exists
//! - `years` - which fiscal years may still be opened
//! - `completeness` - what blocks finalization
//! - `service` - open and finalize against a repository

pub mod completeness;
pub mod error;
pub mod service;
pub mod types;
pub mod wizard;
pub mod years;

#[cfg(test)]
mod wizard_props;

pub use completeness::{Coverage, find_missing_coverage};
pub use error::BilanError;
pub use service::{BilanRepository, BilanService};
pub use types::{Bilan, BilanStatus, FinalizeOutcome, PropertyRef};
pub use wizard::{INSTRUCTIONS, MoveAddress, WizardError, WizardState, instructions};
pub use years::{YEAR_WINDOW, available_years, current_year, current_year_at};
