#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use finance_tracker::models::{Category, Transaction, TransactionInput};
use finance_tracker::store::TransactionStore;
use rust_decimal::Decimal;

/// Parse an RFC 3339 timestamp
pub fn at(timestamp: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(timestamp).unwrap()
}

/// Noon on the given day, at UTC+01:00
pub fn on(day: &str) -> DateTime<FixedOffset> {
    at(&format!("{}T12:00:00+01:00", day))
}

/// Helper to create an expense input dated at noon on `day`
pub fn expense(amount: Decimal, category: Category, day: &str) -> TransactionInput {
    TransactionInput::expense(amount, category, on(day))
}

/// Helper to create an income input dated at noon on `day`
pub fn income(amount: Decimal, category: Category, day: &str) -> TransactionInput {
    TransactionInput::income(amount, category, on(day))
}

/// Build a store from inputs, added in the given order
pub fn store_with(inputs: Vec<TransactionInput>) -> TransactionStore {
    let mut store = TransactionStore::new();
    for input in inputs {
        store.add(input).unwrap();
    }
    store
}

/// Snapshot of a store built from inputs
pub fn snapshot(inputs: Vec<TransactionInput>) -> Vec<Transaction> {
    store_with(inputs).into_transactions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use finance_tracker::models::TransactionType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_helper() {
        let input = expense(dec!(10), Category::Food, "2024-01-15");
        assert_eq!(input.tx_type, TransactionType::Expense);
        assert_eq!(input.date, at("2024-01-15T12:00:00+01:00"));
        assert_eq!(input.note, None);
    }

    #[test]
    fn test_store_with_keeps_newest_first() {
        let store = store_with(vec![
            expense(dec!(1), Category::Food, "2024-01-01"),
            income(dec!(2), Category::Salary, "2024-01-02"),
        ]);
        assert_eq!(store.transactions()[0].amount, dec!(2));
        assert_eq!(store.transactions()[1].amount, dec!(1));
    }
}
