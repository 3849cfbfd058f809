use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;

/// Cumulative balance at the end of a day with activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBalance {
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Running balance after this day
    pub balance: Decimal,
    /// Net change of this day alone
    pub change: Decimal,
}

/// Running balance, one point per calendar day with activity, oldest first
///
/// The balance starts at zero before the first point. Days without
/// transactions are absent: a gap means no change. Days are taken in the
/// offset each transaction was recorded with.
///
/// # Returns
///
/// One `DailyBalance` per active day. The last point's `balance` equals
/// the store balance over the same transactions.
pub fn daily_balance_series<'a, I>(transactions: I) -> Vec<DailyBalance>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut changes: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for tx in transactions {
        let change = changes.entry(tx.date.date_naive()).or_insert(Decimal::ZERO);
        *change = change.saturating_add(tx.signed_amount());
    }

    let mut running = Decimal::ZERO;
    changes
        .into_iter()
        .map(|(date, change)| {
            running = running.saturating_add(change);
            DailyBalance {
                date,
                balance: running,
                change,
            }
        })
        .collect()
}
