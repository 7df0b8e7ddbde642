//! Entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use immoloc_shared::types::{BilanId, EntryId, PropertyId};
use serde::{Deserialize, Serialize};

use super::affectation::Affectation;
use super::amounts::Amounts;
use crate::attachment::Attachment;

/// A persisted accounting entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingEntry {
    /// Entry ID.
    pub id: EntryId,
    /// Ledger the entry belongs to.
    pub bilan_id: BilanId,
    /// Property the flow relates to.
    pub property_id: PropertyId,
    /// Operation date. Always set once persisted.
    pub date: NaiveDate,
    /// Category.
    pub affectation: Option<Affectation>,
    /// Free-text label, defaulted from the category.
    pub label: String,
    /// Credit and debit.
    #[serde(flatten)]
    pub amounts: Amounts,
    /// Supporting files.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// When the entry was first saved.
    pub created_at: DateTime<Utc>,
}

/// Editable state of an entry that may not be persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Operation date; the draft stays local while this is empty.
    pub date: Option<NaiveDate>,
    /// Category.
    pub affectation: Option<Affectation>,
    /// Free-text label.
    pub label: String,
    /// Credit and debit.
    #[serde(flatten)]
    pub amounts: Amounts,
}

impl Default for EntryDraft {
    fn default() -> Self {
        let affectation = Affectation::default();
        Self {
            date: None,
            affectation: Some(affectation),
            label: affectation.as_str().to_string(),
            amounts: Amounts::BLANK,
        }
    }
}

impl From<&AccountingEntry> for EntryDraft {
    fn from(entry: &AccountingEntry) -> Self {
        Self {
            date: Some(entry.date),
            affectation: entry.affectation,
            label: entry.label.clone(),
            amounts: entry.amounts,
        }
    }
}

/// Entry fields ready to be written: dated, amounts normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// Operation date.
    pub date: NaiveDate,
    /// Category.
    pub affectation: Option<Affectation>,
    /// Label.
    pub label: String,
    /// Normalized amounts.
    pub amounts: Amounts,
}

/// One field edit as typed by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    /// `YYYY-MM-DD` or empty.
    Date(String),
    /// A category label or empty.
    Affectation(String),
    /// Free text.
    Label(String),
    /// Raw credit amount.
    Credit(String),
    /// Raw debit amount.
    Debit(String),
}
