//! Ledger domain types.

use chrono::{DateTime, Utc};
use immoloc_shared::types::{BilanId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger status.
///
/// The only transition is `Open → Finalized`; nothing leads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BilanStatus {
    /// Entries can still be edited ("en_cours").
    Open,
    /// Read-only, handed to the accountant ("termine").
    Finalized,
}

impl BilanStatus {
    /// Returns the stored representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "en_cours",
            Self::Finalized => "termine",
        }
    }

    /// Parses a stored status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en_cours" => Some(Self::Open),
            "termine" => Some(Self::Finalized),
            _ => None,
        }
    }
}

impl fmt::Display for BilanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A yearly ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilan {
    /// Ledger ID.
    pub id: BilanId,
    /// Owner.
    pub user_id: UserId,
    /// Fiscal year covered.
    pub year: i32,
    /// Status.
    pub status: BilanStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Set once, when the ledger is finalized.
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Bilan {
    /// Returns true if entries can still be changed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == BilanStatus::Open
    }
}

/// Property as seen by the completeness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRef {
    /// Property ID.
    pub id: immoloc_shared::types::PropertyId,
    /// Display name.
    pub name: String,
}

/// Result of a finalize request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FinalizeOutcome {
    /// The ledger is now read-only.
    Finalized {
        /// Updated ledger.
        bilan: Bilan,
    },
    /// Some properties have no entry this year; the owner must confirm.
    ConfirmationRequired {
        /// Names of the properties with no entry.
        properties_without_entries: Vec<String>,
    },
}
