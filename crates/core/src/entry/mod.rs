//! Accounting entries: categories, amounts, validation and editing.

pub mod affectation;
pub mod amounts;
pub mod buffer;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod amounts_props;

pub use affectation::Affectation;
pub use amounts::{Amounts, parse_amount};
pub use buffer::{EntryBuffer, Flush};
pub use error::EntryError;
pub use service::{CommitOutcome, CommitTarget, EntryRepository, EntryService};
pub use types::{AccountingEntry, EntryDraft, FieldEdit, NormalizedEntry};
pub use validation::{check_date_in_fiscal_year, is_complete, parse_entry_date};
