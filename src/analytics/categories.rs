use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Category, Transaction};
use crate::palette::CategoryPalette;

/// How per-category percentages are rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentagePolicy {
    /// Round each share on its own, half away from zero. The shares may
    /// add up to 99 or 101.
    #[default]
    Independent,
    /// Largest-remainder apportionment: shares always add up to 100.
    LargestRemainder,
}

/// One slice of a category breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: Category,
    pub icon: String,
    pub color: String,
    pub amount: Decimal,
    pub percentage: u32,
    /// Percentage formatted for the chart, e.g. `"42%"`
    pub label: String,
}

/// Per-category sums and shares, largest category first
///
/// Returns an empty vector when there is nothing to chart (no
/// transactions or a zero grand total). Only categories present in the
/// input appear. Ties keep the order in which categories were first seen.
///
/// # Arguments
///
/// * `transactions` - Usually one type only, e.g. `store.by_type(..)`
/// * `palette` - Icon and color lookup for each slice
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use finance_tracker::analytics::aggregate_by_category;
/// use finance_tracker::models::{Category, TransactionInput, TransactionType};
/// use finance_tracker::palette::CategoryPalette;
/// use finance_tracker::store::TransactionStore;
/// use rust_decimal_macros::dec;
///
/// let date = DateTime::parse_from_rfc3339("2024-01-15T10:00:00+01:00").unwrap();
/// let mut store = TransactionStore::new();
/// store.add(TransactionInput::expense(dec!(30), Category::Food, date)).unwrap();
/// store.add(TransactionInput::expense(dec!(10), Category::Home, date)).unwrap();
///
/// let slices = aggregate_by_category(
///     store.by_type(TransactionType::Expense),
///     &CategoryPalette::default(),
/// );
///
/// assert_eq!(slices[0].category, Category::Food);
/// assert_eq!(slices[0].label, "75%");
/// assert_eq!(slices[1].percentage, 25);
/// ```
pub fn aggregate_by_category<'a, I>(transactions: I, palette: &CategoryPalette) -> Vec<CategorySlice>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    aggregate_by_category_with(transactions, palette, PercentagePolicy::Independent)
}

/// Same as [`aggregate_by_category`] with an explicit rounding policy
pub fn aggregate_by_category_with<'a, I>(
    transactions: I,
    palette: &CategoryPalette,
    policy: PercentagePolicy,
) -> Vec<CategorySlice>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sums: Vec<(Category, Decimal)> = Vec::new();
    let mut index: HashMap<Category, usize> = HashMap::new();

    for tx in transactions {
        match index.get(&tx.category) {
            Some(&i) => sums[i].1 = sums[i].1.saturating_add(tx.amount),
            None => {
                index.insert(tx.category, sums.len());
                sums.push((tx.category, tx.amount));
            }
        }
    }

    let total = sums
        .iter()
        .fold(Decimal::ZERO, |acc, (_, amount)| acc.saturating_add(*amount));
    if total.is_zero() {
        return Vec::new();
    }

    // Stable: equal amounts keep first-encounter order
    sums.sort_by(|a, b| b.1.cmp(&a.1));

    let percentages = match policy {
        PercentagePolicy::Independent => independent_percentages(&sums, total),
        PercentagePolicy::LargestRemainder => largest_remainder_percentages(&sums, total),
    };

    sums.into_iter()
        .zip(percentages)
        .map(|((category, amount), percentage)| {
            let style = palette.style(category);
            CategorySlice {
                category,
                icon: style.icon.clone(),
                color: style.color.clone(),
                amount,
                percentage,
                label: format!("{}%", percentage),
            }
        })
        .collect()
}

fn exact_share(amount: Decimal, total: Decimal) -> Decimal {
    amount / total * Decimal::ONE_HUNDRED
}

fn to_percent(value: Decimal) -> u32 {
    // Shares lie in [0, 100]
    value.to_u32().unwrap_or(0)
}

fn independent_percentages(sums: &[(Category, Decimal)], total: Decimal) -> Vec<u32> {
    sums.iter()
        .map(|(_, amount)| {
            to_percent(
                exact_share(*amount, total)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            )
        })
        .collect()
}

fn largest_remainder_percentages(sums: &[(Category, Decimal)], total: Decimal) -> Vec<u32> {
    let shares: Vec<Decimal> = sums
        .iter()
        .map(|(_, amount)| exact_share(*amount, total))
        .collect();

    let mut percentages: Vec<u32> = shares.iter().map(|s| to_percent(s.floor())).collect();
    let assigned: u32 = percentages.iter().sum();
    let missing = 100u32.saturating_sub(assigned) as usize;

    let mut by_remainder: Vec<usize> = (0..shares.len()).collect();
    by_remainder.sort_by(|&a, &b| shares[b].fract().cmp(&shares[a].fract()));

    for &i in by_remainder.iter().take(missing) {
        percentages[i] += 1;
    }

    percentages
}
