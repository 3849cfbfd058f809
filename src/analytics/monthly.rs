use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::models::{Transaction, TransactionType};

/// Number of months kept by [`monthly_breakdown`]
pub const DEFAULT_MONTH_LIMIT: usize = 12;

/// Calendar month bucket key, displayed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month of the transaction's date, in the offset it was recorded with
    pub fn of(tx: &Transaction) -> Self {
        Self::new(tx.date.year(), tx.date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Income, expenses and balance of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub expenses: Decimal,
    pub incomes: Decimal,
    pub balance: Decimal,
}

impl MonthlySummary {
    fn empty(month: MonthKey) -> Self {
        Self {
            month,
            expenses: Decimal::ZERO,
            incomes: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }
}

/// Per-month totals for the 12 most recent months with activity, newest first
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use finance_tracker::analytics::{monthly_breakdown, MonthKey};
/// use finance_tracker::models::{Category, TransactionInput};
/// use finance_tracker::store::TransactionStore;
/// use rust_decimal_macros::dec;
///
/// let jan = DateTime::parse_from_rfc3339("2024-01-15T10:00:00+01:00").unwrap();
/// let feb = DateTime::parse_from_rfc3339("2024-02-01T10:00:00+01:00").unwrap();
/// let mut store = TransactionStore::new();
/// store.add(TransactionInput::income(dec!(1000), Category::Salary, jan)).unwrap();
/// store.add(TransactionInput::expense(dec!(40), Category::Food, feb)).unwrap();
///
/// let months = monthly_breakdown(store.transactions());
///
/// assert_eq!(months[0].month, MonthKey::new(2024, 2));
/// assert_eq!(months[0].balance, dec!(-40));
/// assert_eq!(months[1].incomes, dec!(1000));
/// ```
pub fn monthly_breakdown<'a, I>(transactions: I) -> Vec<MonthlySummary>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    monthly_breakdown_with_limit(transactions, DEFAULT_MONTH_LIMIT)
}

/// Per-month totals for the `limit` most recent months with activity
///
/// Months without transactions never appear. Older months beyond the limit
/// are dropped from the result.
pub fn monthly_breakdown_with_limit<'a, I>(transactions: I, limit: usize) -> Vec<MonthlySummary>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<MonthKey, MonthlySummary> = BTreeMap::new();

    for tx in transactions {
        let key = MonthKey::of(tx);
        let bucket = buckets
            .entry(key)
            .or_insert_with(|| MonthlySummary::empty(key));

        match tx.tx_type {
            TransactionType::Expense => {
                bucket.expenses = bucket.expenses.saturating_add(tx.amount)
            }
            TransactionType::Income => bucket.incomes = bucket.incomes.saturating_add(tx.amount),
        }
    }

    buckets
        .into_values()
        .rev()
        .take(limit)
        .map(|mut bucket| {
            bucket.balance = bucket.incomes.saturating_sub(bucket.expenses);
            bucket
        })
        .collect()
}
