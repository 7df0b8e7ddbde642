//! Dirty buffer for one entry row.
//!
//! Edits accumulate locally. [`EntryBuffer::flush`] is the single point where a
//! write is decided: nothing leaves the buffer until the draft carries a date
//! inside the ledger's fiscal year.

use immoloc_shared::types::EntryId;

use super::affectation::Affectation;
use super::error::EntryError;
use super::types::{AccountingEntry, EntryDraft, FieldEdit, NormalizedEntry};
use super::validation::{check_date_in_fiscal_year, parse_entry_date};

/// What a flush decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flush {
    /// No edit since the last successful save.
    Clean,
    /// Draft has no date yet; it stays local.
    Held,
    /// Write these fields, inserting when `entry_id` is `None`.
    Write {
        /// Existing row to update, if any.
        entry_id: Option<EntryId>,
        /// Fields to store.
        entry: NormalizedEntry,
    },
}

/// Local editing state of a single entry.
#[derive(Debug, Clone)]
pub struct EntryBuffer {
    entry_id: Option<EntryId>,
    fiscal_year: i32,
    draft: EntryDraft,
    dirty: bool,
}

impl EntryBuffer {
    /// Starts a new, unsaved entry with default values.
    #[must_use]
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            entry_id: None,
            fiscal_year,
            draft: EntryDraft::default(),
            dirty: true,
        }
    }

    /// Opens a buffer over an already persisted entry.
    #[must_use]
    pub fn from_entry(entry: &AccountingEntry, fiscal_year: i32) -> Self {
        Self {
            entry_id: Some(entry.id),
            fiscal_year,
            draft: EntryDraft::from(entry),
            dirty: false,
        }
    }

    /// Current local state.
    #[must_use]
    pub const fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    /// Persisted row behind this buffer, if any.
    #[must_use]
    pub const fn entry_id(&self) -> Option<EntryId> {
        self.entry_id
    }

    /// True when local state differs from what was last saved.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Applies one field edit to the local state.
    ///
    /// Choosing a category also overwrites the label with it.
    ///
    /// # Errors
    ///
    /// Returns an error for an unparseable date or an unknown category; the
    /// buffer is left unchanged in that case.
    pub fn apply(&mut self, edit: &FieldEdit) -> Result<(), EntryError> {
        match edit {
            FieldEdit::Date(raw) => {
                self.draft.date = parse_entry_date(raw)?;
            }
            FieldEdit::Affectation(raw) => {
                if raw.trim().is_empty() {
                    self.draft.affectation = None;
                } else {
                    let affectation = Affectation::parse(raw)
                        .ok_or_else(|| EntryError::UnknownAffectation(raw.clone()))?;
                    self.draft.affectation = Some(affectation);
                    self.draft.label = affectation.as_str().to_string();
                }
            }
            FieldEdit::Label(label) => {
                self.draft.label.clone_from(label);
            }
            FieldEdit::Credit(raw) => self.draft.amounts.edit_credit(raw),
            FieldEdit::Debit(raw) => self.draft.amounts.edit_debit(raw),
        }
        self.dirty = true;
        Ok(())
    }

    /// Decides whether and what to write.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::DateOutsideFiscalYear` when the date is in another
    /// year; the date is cleared so the row is held until a valid one is typed.
    pub fn flush(&mut self) -> Result<Flush, EntryError> {
        if !self.dirty {
            return Ok(Flush::Clean);
        }

        let Some(date) = self.draft.date else {
            return Ok(Flush::Held);
        };

        if let Err(err) = check_date_in_fiscal_year(date, self.fiscal_year) {
            self.draft.date = None;
            return Err(err);
        }

        Ok(Flush::Write {
            entry_id: self.entry_id,
            entry: NormalizedEntry {
                date,
                affectation: self.draft.affectation,
                label: self.draft.label.clone(),
                amounts: self.draft.amounts.normalized(),
            },
        })
    }

    /// Records a successful write. Local state becomes the stored state.
    pub fn mark_saved(&mut self, saved: &AccountingEntry) {
        self.entry_id = Some(saved.id);
        self.draft = EntryDraft::from(saved);
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::amounts::Amounts;
    use chrono::{NaiveDate, Utc};
    use immoloc_shared::types::{BilanId, PropertyId};
    use rust_decimal_macros::dec;

    fn saved_from(buffer: &EntryBuffer, flush: Flush) -> AccountingEntry {
        let Flush::Write { entry_id, entry } = flush else {
            panic!("expected a write");
        };
        AccountingEntry {
            id: entry_id.or(buffer.entry_id()).unwrap_or_default(),
            bilan_id: BilanId::new(),
            property_id: PropertyId::new(),
            date: entry.date,
            affectation: entry.affectation,
            label: entry.label,
            amounts: entry.amounts,
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_undated_draft_is_held() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Credit("850".into())).unwrap();
        assert_eq!(buffer.flush().unwrap(), Flush::Held);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_dated_draft_is_written_as_insert() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Date("2024-03-15".into())).unwrap();
        buffer.apply(&FieldEdit::Credit("850".into())).unwrap();

        match buffer.flush().unwrap() {
            Flush::Write { entry_id, entry } => {
                assert_eq!(entry_id, None);
                assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
                assert_eq!(entry.affectation, Some(Affectation::Loyer));
                assert_eq!(entry.label, "Loyer");
                assert_eq!(entry.amounts.credit, Some(dec!(850)));
                assert_eq!(entry.amounts.debit, None);
            }
            other => panic!("unexpected flush {other:?}"),
        }
    }

    #[test]
    fn test_date_in_other_year_is_cleared() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Date("2023-12-31".into())).unwrap();

        let err = buffer.flush().unwrap_err();
        assert!(matches!(err, EntryError::DateOutsideFiscalYear { .. }));
        assert_eq!(buffer.draft().date, None);
        assert_eq!(buffer.flush().unwrap(), Flush::Held);
    }

    #[test]
    fn test_affectation_overwrites_label() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Label("Loyer janvier".into())).unwrap();
        buffer
            .apply(&FieldEdit::Affectation("Taxe foncière".into()))
            .unwrap();
        assert_eq!(buffer.draft().label, "Taxe foncière");

        buffer.apply(&FieldEdit::Label("TF 2024".into())).unwrap();
        assert_eq!(buffer.draft().affectation, Some(Affectation::TaxeFonciere));
        assert_eq!(buffer.draft().label, "TF 2024");
    }

    #[test]
    fn test_clearing_affectation_keeps_label() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Affectation(String::new())).unwrap();
        assert_eq!(buffer.draft().affectation, None);
        assert_eq!(buffer.draft().label, "Loyer");
    }

    #[test]
    fn test_unknown_affectation_leaves_buffer_untouched() {
        let mut buffer = EntryBuffer::new(2024);
        let err = buffer
            .apply(&FieldEdit::Affectation("Salaire".into()))
            .unwrap_err();
        assert!(matches!(err, EntryError::UnknownAffectation(_)));
        assert_eq!(buffer.draft(), &EntryDraft::default());
    }

    #[test]
    fn test_saved_buffer_is_clean_until_next_edit() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Date("2024-06-01".into())).unwrap();
        buffer.apply(&FieldEdit::Debit("42,50".into())).unwrap();
        let flush = buffer.flush().unwrap();
        let saved = saved_from(&buffer, flush);
        buffer.mark_saved(&saved);

        assert_eq!(buffer.entry_id(), Some(saved.id));
        assert_eq!(buffer.flush().unwrap(), Flush::Clean);
        assert_eq!(buffer.draft().amounts.credit, None);
        assert_eq!(buffer.draft().amounts.debit, Some(dec!(42.50)));

        buffer.apply(&FieldEdit::Credit("10".into())).unwrap();
        match buffer.flush().unwrap() {
            Flush::Write { entry_id, entry } => {
                assert_eq!(entry_id, Some(saved.id));
                assert_eq!(entry.amounts.debit, None);
            }
            other => panic!("unexpected flush {other:?}"),
        }
    }

    #[test]
    fn test_flush_normalizes_zero_amounts() {
        let mut buffer = EntryBuffer::new(2024);
        buffer.apply(&FieldEdit::Date("2024-01-05".into())).unwrap();
        buffer.apply(&FieldEdit::Credit("0".into())).unwrap();
        buffer.apply(&FieldEdit::Debit("".into())).unwrap();
        let Flush::Write { entry, .. } = buffer.flush().unwrap() else {
            panic!("expected a write");
        };
        assert_eq!(entry.amounts, Amounts::BLANK);
    }
}
