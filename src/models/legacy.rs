use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::category::Category;
use super::transaction::{Transaction, TransactionId, TransactionType};

/// Record shape written before income tracking existed: no `type` field,
/// every record is an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyExpense {
    pub id: TransactionId,
    pub amount: Decimal,
    pub category: Category,
    pub date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LegacyExpense {
    /// Stamp the record as an expense, keeping id, amount, date and note
    pub fn into_transaction(self) -> Transaction {
        let category = if self.category.is_valid_for(TransactionType::Expense) {
            self.category
        } else {
            warn!(
                "Legacy record {} has non-expense category '{}', filing under '{}'",
                self.id,
                self.category,
                Category::Other
            );
            Category::Other
        };

        Transaction {
            id: self.id,
            amount: self.amount,
            category,
            tx_type: TransactionType::Expense,
            date: self.date,
            note: self.note,
        }
    }
}

/// A persisted collection, tagged by the format it was written in
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCollection {
    Legacy(Vec<LegacyExpense>),
    Current(Vec<Transaction>),
}

impl StoredCollection {
    /// One-way conversion to the current format
    ///
    /// Legacy records are migrated one to one, preserving order.
    pub fn into_current(self) -> Vec<Transaction> {
        match self {
            StoredCollection::Legacy(expenses) => expenses
                .into_iter()
                .map(LegacyExpense::into_transaction)
                .collect(),
            StoredCollection::Current(transactions) => transactions,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StoredCollection::Legacy(expenses) => expenses.len(),
            StoredCollection::Current(transactions) => transactions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
