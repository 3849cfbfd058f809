//! Read-only views derived from a snapshot of transactions.
//!
//! Every function here is pure: it borrows the transactions, never mutates
//! them, and returns the same output for the same input.

pub mod categories;
pub mod daily;
pub mod monthly;

pub use categories::{
    aggregate_by_category, aggregate_by_category_with, CategorySlice, PercentagePolicy,
};
pub use daily::{daily_balance_series, DailyBalance};
pub use monthly::{
    monthly_breakdown, monthly_breakdown_with_limit, MonthKey, MonthlySummary, DEFAULT_MONTH_LIMIT,
};

use serde::Serialize;

use crate::models::{Transaction, TransactionType};
use crate::palette::CategoryPalette;

/// Everything the statistics screen renders for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub expenses_by_category: Vec<CategorySlice>,
    pub incomes_by_category: Vec<CategorySlice>,
    pub months: Vec<MonthlySummary>,
    pub daily_balance: Vec<DailyBalance>,
}

impl StatsReport {
    pub fn build(
        transactions: &[Transaction],
        palette: &CategoryPalette,
        month_limit: usize,
    ) -> Self {
        Self {
            expenses_by_category: aggregate_by_category(
                of_type(transactions, TransactionType::Expense),
                palette,
            ),
            incomes_by_category: aggregate_by_category(
                of_type(transactions, TransactionType::Income),
                palette,
            ),
            months: monthly_breakdown_with_limit(transactions, month_limit),
            daily_balance: daily_balance_series(transactions),
        }
    }

    /// True when there is nothing to chart
    pub fn is_empty(&self) -> bool {
        self.expenses_by_category.is_empty() && self.incomes_by_category.is_empty()
    }
}

fn of_type(
    transactions: &[Transaction],
    tx_type: TransactionType,
) -> impl Iterator<Item = &Transaction> + '_ {
    transactions.iter().filter(move |t| t.tx_type == tx_type)
}
