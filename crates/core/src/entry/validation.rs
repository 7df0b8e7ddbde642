//! Field-level rules for a single entry.

use chrono::{Datelike, NaiveDate};

use super::affectation::Affectation;
use super::amounts::Amounts;
use super::error::EntryError;
use super::types::{AccountingEntry, EntryDraft};

/// Parses a `YYYY-MM-DD` date field. Empty input means "no date yet".
///
/// # Errors
///
/// Returns `EntryError::InvalidDate` for any other malformed input.
pub fn parse_entry_date(raw: &str) -> Result<Option<NaiveDate>, EntryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| EntryError::InvalidDate(raw.to_string()))
}

/// Checks that a date falls in the ledger's fiscal year.
///
/// # Errors
///
/// Returns `EntryError::DateOutsideFiscalYear` otherwise.
pub fn check_date_in_fiscal_year(date: NaiveDate, fiscal_year: i32) -> Result<(), EntryError> {
    if date.year() == fiscal_year {
        Ok(())
    } else {
        Err(EntryError::DateOutsideFiscalYear { date, fiscal_year })
    }
}

fn has_basic_fields(
    date: Option<NaiveDate>,
    affectation: Option<Affectation>,
    label: &str,
    amounts: &Amounts,
) -> bool {
    date.is_some() && affectation.is_some() && !label.trim().is_empty() && amounts.has_flow()
}

impl EntryDraft {
    /// Date, category, label and a non-zero amount are all present.
    #[must_use]
    pub fn has_basic_fields(&self) -> bool {
        has_basic_fields(self.date, self.affectation, &self.label, &self.amounts)
    }
}

impl AccountingEntry {
    /// Date, category, label and a non-zero amount are all present.
    #[must_use]
    pub fn has_basic_fields(&self) -> bool {
        has_basic_fields(
            Some(self.date),
            self.affectation,
            &self.label,
            &self.amounts,
        )
    }

    /// Category demands a supporting file and none is attached.
    #[must_use]
    pub fn is_missing_mandatory_attachment(&self) -> bool {
        self.affectation
            .is_some_and(|a| a.requires_attachment())
            && self.attachments.is_empty()
    }
}

/// Returns true if the entry is fully filled in, including any mandatory attachment.
#[must_use]
pub fn is_complete(entry: &AccountingEntry) -> bool {
    entry.has_basic_fields() && !entry.is_missing_mandatory_attachment()
}
