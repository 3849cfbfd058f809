use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use crate::error::{Result, TrackerError};

/// Maximum length of a transaction note, in characters
pub const MAX_NOTE_CHARS: usize = 50;

/// Largest amount a single transaction may carry
///
/// Keeps totals over any realistic collection far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Direction of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Expense => f.write_str("expense"),
            TransactionType::Income => f.write_str("income"),
        }
    }
}

/// Opaque transaction identifier
///
/// Fresh ids are UUIDs. Ids loaded from storage are kept verbatim, whatever
/// their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to create or fully replace a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub amount: Decimal,
    pub category: Category,
    pub tx_type: TransactionType,
    pub date: DateTime<FixedOffset>,
    pub note: Option<String>,
}

impl TransactionInput {
    pub fn expense(amount: Decimal, category: Category, date: DateTime<FixedOffset>) -> Self {
        Self {
            amount,
            category,
            tx_type: TransactionType::Expense,
            date,
            note: None,
        }
    }

    pub fn income(amount: Decimal, category: Category, date: DateTime<FixedOffset>) -> Self {
        Self {
            amount,
            category,
            tx_type: TransactionType::Income,
            date,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Check amount, category/type pairing and note length
    ///
    /// # Arguments
    ///
    /// * `max_note_chars` - Longest accepted note, counted in characters
    ///
    /// # Returns
    ///
    /// `Ok(())` when the input may enter the store, otherwise the first
    /// violated rule
    pub fn validate(&self, max_note_chars: usize) -> Result<()> {
        check_amount(self.amount)?;

        if !self.category.is_valid_for(self.tx_type) {
            return Err(TrackerError::CategoryTypeMismatch {
                category: self.category,
                tx_type: self.tx_type,
            });
        }

        if let Some(note) = &self.note {
            let len = note.chars().count();
            if len > max_note_chars {
                return Err(TrackerError::NoteTooLong {
                    len,
                    max: max_note_chars,
                });
            }
        }

        Ok(())
    }
}

/// A recorded expense or income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub(crate) fn from_input(id: TransactionId, input: TransactionInput) -> Self {
        Self {
            id,
            amount: input.amount,
            category: input.category,
            tx_type: input.tx_type,
            date: input.date,
            note: input.note,
        }
    }

    /// Editable fields of this transaction, e.g. to prefill an edit form
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput {
            amount: self.amount,
            category: self.category,
            tx_type: self.tx_type,
            date: self.date,
            note: self.note.clone(),
        }
    }

    /// Amount with sign applied: income is positive, expense negative
    pub fn signed_amount(&self) -> Decimal {
        match self.tx_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Parse a user-entered amount
///
/// Accepts a comma as decimal separator ("12,50"). Rejects anything that is
/// not a number or is not strictly positive.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(TrackerError::InvalidAmount(raw.to_string()));
    }

    let amount = normalized
        .parse::<Decimal>()
        .map_err(|_| TrackerError::InvalidAmount(raw.to_string()))?;

    check_amount(amount)?;
    Ok(amount)
}

/// Amount must lie in `(0, MAX_AMOUNT]`
pub(crate) fn check_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(TrackerError::NonPositiveAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(TrackerError::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}
