//! Credit/debit parsing and the mutual-exclusion rule.
//!
//! At most one of `credit`/`debit` carries a non-zero value. A row with neither is
//! stored as `credit = 0, debit = null`, the canonical blank state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Most decimal places an amount may carry (column `NUMERIC(14, 2)`).
pub const MAX_SCALE: u32 = 2;

/// Most digits before the decimal separator (column `NUMERIC(14, 2)`).
pub const MAX_INTEGER_DIGITS: u32 = 12;

/// Parses a raw amount as typed by the owner.
///
/// Accepts `.` or `,` as the decimal separator and ignores spaces used as
/// thousands separators. Empty or non-numeric input yields `None`, as does
/// anything the store could not hold exactly: more than [`MAX_SCALE`]
/// significant decimals or more than [`MAX_INTEGER_DIGITS`] integer digits.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .ok()
        .map(|value| value.normalize())
        .filter(fits_column)
}

fn fits_column(value: &Decimal) -> bool {
    let limit = Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS));
    value.scale() <= MAX_SCALE && value.abs().trunc() < limit
}

fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

/// Credit (encaissement) and debit (décaissement) of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    /// Cash in.
    pub credit: Option<Decimal>,
    /// Cash out.
    pub debit: Option<Decimal>,
}

impl Default for Amounts {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Amounts {
    /// Canonical state of an entry with no flow yet.
    pub const BLANK: Self = Self {
        credit: Some(Decimal::ZERO),
        debit: None,
    };

    /// Builds normalized amounts from two optional values.
    ///
    /// Zero counts as absent. When both sides are set, credit is kept.
    #[must_use]
    pub fn normalize(credit: Option<Decimal>, debit: Option<Decimal>) -> Self {
        match (non_zero(credit), non_zero(debit)) {
            (None, None) => Self::BLANK,
            (Some(c), _) => Self {
                credit: Some(c),
                debit: None,
            },
            (None, Some(d)) => Self {
                credit: None,
                debit: Some(d),
            },
        }
    }

    /// Builds normalized amounts from raw text fields.
    #[must_use]
    pub fn from_raw(credit_raw: &str, debit_raw: &str) -> Self {
        Self::normalize(parse_amount(credit_raw), parse_amount(debit_raw))
    }

    /// Returns the normalized form of these amounts.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::normalize(self.credit, self.debit)
    }

    /// Applies an edit of the credit field.
    ///
    /// A genuine non-zero value clears the debit; anything else leaves it alone.
    pub fn edit_credit(&mut self, raw: &str) {
        self.credit = parse_amount(raw);
        if non_zero(self.credit).is_some() {
            self.debit = None;
        }
    }

    /// Applies an edit of the debit field.
    ///
    /// A genuine non-zero value clears the credit; anything else leaves it alone.
    pub fn edit_debit(&mut self, raw: &str) {
        self.debit = parse_amount(raw);
        if non_zero(self.debit).is_some() {
            self.credit = None;
        }
    }

    /// Returns true if at most one side is non-zero.
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        !(non_zero(self.credit).is_some() && non_zero(self.debit).is_some())
    }

    /// Returns true if either side carries a non-zero amount.
    #[must_use]
    pub fn has_flow(&self) -> bool {
        non_zero(self.credit).is_some() || non_zero(self.debit).is_some()
    }

    /// Credit with null counted as zero.
    #[must_use]
    pub fn credit_or_zero(&self) -> Decimal {
        self.credit.unwrap_or(Decimal::ZERO)
    }

    /// Debit with null counted as zero.
    #[must_use]
    pub fn debit_or_zero(&self) -> Decimal {
        self.debit.unwrap_or(Decimal::ZERO)
    }
}
