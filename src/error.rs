use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Category, TransactionType};

/// Errors surfaced by the tracker
///
/// Validation variants reject input before it reaches the store.
/// A missing id on update/delete is deliberately not represented here.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("amount is not a valid number: '{0}'")]
    InvalidAmount(String),

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    #[error("category '{category}' is not valid for {tx_type} transactions")]
    CategoryTypeMismatch {
        category: Category,
        tx_type: TransactionType,
    },

    #[error("note is {len} characters long, the maximum is {max}")]
    NoteTooLong { len: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
