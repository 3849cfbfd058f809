mod common;

use chrono::NaiveDate;
use common::{at, expense, income, snapshot};
use finance_tracker::analytics::{
    aggregate_by_category, aggregate_by_category_with, daily_balance_series, monthly_breakdown,
    monthly_breakdown_with_limit, DailyBalance, MonthKey, MonthlySummary, PercentagePolicy,
    StatsReport,
};
use finance_tracker::models::{Category, Transaction, TransactionInput, TransactionType};
use finance_tracker::palette::{CategoryPalette, CategoryStyle};
use finance_tracker::store::TransactionStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

#[test]
fn test_empty_input_yields_empty_breakdown() {
    let empty: Vec<Transaction> = Vec::new();
    assert!(aggregate_by_category(&empty, &CategoryPalette::default()).is_empty());
}

#[test]
fn test_breakdown_sorted_by_amount_descending() {
    let transactions = snapshot(vec![
        expense(dec!(10), Category::Food, "2024-01-01"),
        expense(dec!(60), Category::Home, "2024-01-02"),
        expense(dec!(20), Category::Food, "2024-01-03"),
        expense(dec!(10), Category::Health, "2024-01-04"),
    ]);

    let slices = aggregate_by_category(&transactions, &CategoryPalette::default());

    let categories: Vec<Category> = slices.iter().map(|s| s.category).collect();
    assert_eq!(
        categories,
        vec![Category::Home, Category::Food, Category::Health]
    );
    assert_eq!(slices[0].amount, dec!(60));
    assert_eq!(slices[1].amount, dec!(30));
    assert_eq!(slices[2].amount, dec!(10));
}

#[test]
fn test_breakdown_percentages_and_labels() {
    let transactions = snapshot(vec![
        expense(dec!(60), Category::Home, "2024-01-01"),
        expense(dec!(30), Category::Food, "2024-01-02"),
        expense(dec!(10), Category::Health, "2024-01-03"),
    ]);

    let slices = aggregate_by_category(&transactions, &CategoryPalette::default());

    let percentages: Vec<u32> = slices.iter().map(|s| s.percentage).collect();
    assert_eq!(percentages, vec![60, 30, 10]);
    assert_eq!(slices[0].label, "60%");
    assert_eq!(slices[0].icon, "home");
    assert_eq!(slices[0].color, "#FDCB6E");
}

#[test]
fn test_absent_categories_are_omitted() {
    let transactions = snapshot(vec![expense(dec!(5), Category::Leisure, "2024-01-01")]);

    let slices = aggregate_by_category(&transactions, &CategoryPalette::default());

    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].category, Category::Leisure);
    assert_eq!(slices[0].percentage, 100);
}

#[test]
fn test_breakdown_amounts_sum_to_grand_total() {
    let transactions = snapshot(vec![
        expense(dec!(0.10), Category::Food, "2024-01-01"),
        expense(dec!(0.20), Category::Transport, "2024-01-02"),
        expense(dec!(33.33), Category::Home, "2024-01-03"),
        expense(dec!(12.01), Category::Food, "2024-01-04"),
        expense(dec!(7), Category::Other, "2024-01-05"),
    ]);
    let total: Decimal = transactions.iter().map(|t| t.amount).sum();

    let slices = aggregate_by_category(&transactions, &CategoryPalette::default());
    let summed: Decimal = slices.iter().map(|s| s.amount).sum();

    assert_eq!(summed, total);
}

#[test]
fn test_independent_rounding_may_drift_from_one_hundred() {
    let transactions = snapshot(vec![
        expense(dec!(1), Category::Food, "2024-01-01"),
        expense(dec!(1), Category::Home, "2024-01-02"),
        expense(dec!(1), Category::Health, "2024-01-03"),
    ]);

    let slices = aggregate_by_category(&transactions, &CategoryPalette::default());
    let sum: u32 = slices.iter().map(|s| s.percentage).sum();

    assert_eq!(sum, 99);
}

#[test]
fn test_largest_remainder_sums_to_one_hundred() {
    let transactions = snapshot(vec![
        expense(dec!(1), Category::Food, "2024-01-01"),
        expense(dec!(1), Category::Home, "2024-01-02"),
        expense(dec!(1), Category::Health, "2024-01-03"),
    ]);

    let slices = aggregate_by_category_with(
        &transactions,
        &CategoryPalette::default(),
        PercentagePolicy::LargestRemainder,
    );
    let sum: u32 = slices.iter().map(|s| s.percentage).sum();

    assert_eq!(sum, 100);
}

#[test]
fn test_ties_keep_first_encounter_order() {
    // Store order is newest first, so Transport is encountered first
    let transactions = snapshot(vec![
        expense(dec!(10), Category::Food, "2024-01-01"),
        expense(dec!(10), Category::Transport, "2024-01-02"),
    ]);

    let slices = aggregate_by_category(&transactions, &CategoryPalette::default());

    assert_eq!(slices[0].category, Category::Transport);
    assert_eq!(slices[1].category, Category::Food);
    assert_eq!(slices[0].percentage, 50);
}

#[test]
fn test_unknown_palette_entry_falls_back() {
    let transactions = snapshot(vec![income(dec!(100), Category::Salary, "2024-01-01")]);
    let palette = CategoryPalette::with_fallback(CategoryStyle::new("grid", "#B2BEC3"));

    let slices = aggregate_by_category(&transactions, &palette);

    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].icon, "grid");
    assert_eq!(slices[0].color, "#B2BEC3");
}

#[test]
fn test_breakdown_accepts_prefiltered_store_view() {
    let store = TransactionStore::from_transactions(snapshot(vec![
        expense(dec!(40), Category::Food, "2024-01-01"),
        income(dec!(500), Category::Salary, "2024-01-02"),
    ]));

    let slices = aggregate_by_category(
        store.by_type(TransactionType::Expense),
        &CategoryPalette::default(),
    );

    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].category, Category::Food);
    assert_eq!(slices[0].percentage, 100);
}

#[test]
fn test_breakdown_is_idempotent() {
    let transactions = snapshot(vec![
        expense(dec!(3), Category::Food, "2024-01-01"),
        expense(dec!(7), Category::Home, "2024-01-02"),
    ]);
    let palette = CategoryPalette::default();
    let before = transactions.clone();

    let first = aggregate_by_category(&transactions, &palette);
    let second = aggregate_by_category(&transactions, &palette);

    assert_eq!(first, second);
    assert_eq!(transactions, before);
}

// ---------------------------------------------------------------------------
// Monthly breakdown
// ---------------------------------------------------------------------------

#[test]
fn test_monthly_breakdown_example() {
    let transactions = snapshot(vec![
        expense(dec!(50), Category::Food, "2024-01-15"),
        income(dec!(100), Category::Salary, "2024-01-20"),
        expense(dec!(30), Category::Home, "2024-02-01"),
    ]);

    let months = monthly_breakdown(&transactions);

    assert_eq!(
        months,
        vec![
            MonthlySummary {
                month: MonthKey::new(2024, 2),
                expenses: dec!(30),
                incomes: dec!(0),
                balance: dec!(-30),
            },
            MonthlySummary {
                month: MonthKey::new(2024, 1),
                expenses: dec!(50),
                incomes: dec!(100),
                balance: dec!(50),
            },
        ]
    );
    assert_eq!(months[0].month.to_string(), "2024-02");
    assert_eq!(months[1].month.to_string(), "2024-01");
}

#[test]
fn test_monthly_breakdown_skips_empty_months() {
    let transactions = snapshot(vec![
        expense(dec!(1), Category::Food, "2024-01-10"),
        expense(dec!(1), Category::Food, "2024-04-10"),
    ]);

    let keys: Vec<String> = monthly_breakdown(&transactions)
        .iter()
        .map(|m| m.month.to_string())
        .collect();

    assert_eq!(keys, vec!["2024-04", "2024-01"]);
}

#[test]
fn test_monthly_breakdown_orders_across_years() {
    let transactions = snapshot(vec![
        expense(dec!(1), Category::Food, "2023-12-31"),
        expense(dec!(1), Category::Food, "2024-01-01"),
        expense(dec!(1), Category::Food, "2023-02-01"),
    ]);

    let keys: Vec<String> = monthly_breakdown(&transactions)
        .iter()
        .map(|m| m.month.to_string())
        .collect();

    assert_eq!(keys, vec!["2024-01", "2023-12", "2023-02"]);
}

#[test]
fn test_monthly_breakdown_caps_at_twelve_most_recent() {
    let mut inputs = Vec::new();
    for month in 1..=12 {
        inputs.push(expense(dec!(1), Category::Food, &format!("2023-{:02}-15", month)));
    }
    inputs.push(expense(dec!(1), Category::Food, "2024-01-15"));
    inputs.push(expense(dec!(1), Category::Food, "2024-02-15"));
    let transactions = snapshot(inputs);

    let months = monthly_breakdown(&transactions);

    assert_eq!(months.len(), 12);
    assert_eq!(months[0].month, MonthKey::new(2024, 2));
    assert_eq!(months[11].month, MonthKey::new(2023, 3));
    // Dropped from the view, not from the data
    assert_eq!(transactions.len(), 14);
}

#[test]
fn test_monthly_breakdown_custom_limit() {
    let transactions = snapshot(vec![
        expense(dec!(1), Category::Food, "2024-01-15"),
        expense(dec!(1), Category::Food, "2024-02-15"),
        expense(dec!(1), Category::Food, "2024-03-15"),
    ]);

    let months = monthly_breakdown_with_limit(&transactions, 2);

    assert_eq!(months.len(), 2);
    assert_eq!(months[1].month, MonthKey::new(2024, 2));
}

#[test]
fn test_monthly_bucket_uses_recorded_offset() {
    // 00:30 on Feb 1st at UTC+01:00 is still Jan 31st in UTC
    let transactions = snapshot(vec![
        TransactionInput::expense(dec!(5), Category::Food, at("2024-01-31T23:30:00+01:00")),
        TransactionInput::expense(dec!(7), Category::Food, at("2024-02-01T00:30:00+01:00")),
    ]);

    let months = monthly_breakdown(&transactions);

    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, MonthKey::new(2024, 2));
    assert_eq!(months[0].expenses, dec!(7));
    assert_eq!(months[1].expenses, dec!(5));
}

#[test]
fn test_monthly_breakdown_of_empty_input() {
    let empty: Vec<Transaction> = Vec::new();
    assert!(monthly_breakdown(&empty).is_empty());
}

// ---------------------------------------------------------------------------
// Daily running balance
// ---------------------------------------------------------------------------

#[test]
fn test_daily_series_with_gap() {
    let transactions = snapshot(vec![
        income(dec!(100), Category::Salary, "2024-03-01"),
        expense(dec!(40), Category::Food, "2024-03-03"),
    ]);

    let series = daily_balance_series(&transactions);

    assert_eq!(
        series,
        vec![
            DailyBalance {
                date: day("2024-03-01"),
                balance: dec!(100),
                change: dec!(100),
            },
            DailyBalance {
                date: day("2024-03-03"),
                balance: dec!(60),
                change: dec!(-40),
            },
        ]
    );
}

#[test]
fn test_daily_series_nets_same_day_activity() {
    let transactions = snapshot(vec![
        income(dec!(20), Category::Gifts, "2024-03-05"),
        expense(dec!(5), Category::Food, "2024-03-05"),
        expense(dec!(30), Category::Home, "2024-03-02"),
    ]);

    let series = daily_balance_series(&transactions);

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, day("2024-03-02"));
    assert_eq!(series[0].change, dec!(-30));
    assert_eq!(series[0].balance, dec!(-30));
    assert_eq!(series[1].change, dec!(15));
    assert_eq!(series[1].balance, dec!(-15));
}

#[test]
fn test_daily_series_is_order_independent() {
    let transactions = snapshot(vec![
        income(dec!(10), Category::Salary, "2024-01-03"),
        expense(dec!(4), Category::Food, "2024-01-01"),
        income(dec!(6), Category::Gifts, "2024-01-02"),
    ]);
    let mut reversed = transactions.clone();
    reversed.reverse();

    assert_eq!(
        daily_balance_series(&transactions),
        daily_balance_series(&reversed)
    );
}

#[test]
fn test_daily_series_final_balance_equals_store_balance() {
    let store = TransactionStore::from_transactions(snapshot(vec![
        income(dec!(1200), Category::Salary, "2024-01-01"),
        expense(dec!(300.75), Category::Home, "2024-01-05"),
        expense(dec!(45.10), Category::Food, "2024-01-09"),
        income(dec!(80), Category::Freelance, "2024-02-14"),
    ]));

    let series = daily_balance_series(store.transactions());

    assert_eq!(series.last().map(|p| p.balance), Some(store.balance()));
}

// ---------------------------------------------------------------------------
// Stats report
// ---------------------------------------------------------------------------

#[test]
fn test_stats_report_splits_by_type() {
    let transactions = snapshot(vec![
        expense(dec!(25), Category::Food, "2024-01-01"),
        expense(dec!(75), Category::Transport, "2024-01-02"),
        income(dec!(300), Category::Salary, "2024-01-03"),
    ]);

    let report = StatsReport::build(&transactions, &CategoryPalette::default(), 12);

    assert!(!report.is_empty());
    assert_eq!(report.expenses_by_category.len(), 2);
    assert_eq!(report.expenses_by_category[0].category, Category::Transport);
    assert_eq!(report.expenses_by_category[0].percentage, 75);
    assert_eq!(report.incomes_by_category.len(), 1);
    assert_eq!(report.incomes_by_category[0].percentage, 100);
    assert_eq!(report.months.len(), 1);
    assert_eq!(report.months[0].balance, dec!(200));
    assert_eq!(report.daily_balance.len(), 3);
}

#[test]
fn test_stats_report_empty() {
    let report = StatsReport::build(&[], &CategoryPalette::default(), 12);
    assert!(report.is_empty());
    assert!(report.months.is_empty());
    assert!(report.daily_balance.is_empty());
}

#[test]
fn test_stats_report_serializes_keys_as_text() {
    let transactions = snapshot(vec![expense(dec!(9), Category::Food, "2024-07-04")]);

    let report = StatsReport::build(&transactions, &CategoryPalette::default(), 12);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["months"][0]["month"], "2024-07");
    assert_eq!(json["daily_balance"][0]["date"], "2024-07-04");
    assert_eq!(json["expenses_by_category"][0]["category"], "Comida");
    assert_eq!(json["expenses_by_category"][0]["label"], "100%");
}

// ---------------------------------------------------------------------------
// Repeated calls and extreme amounts
// ---------------------------------------------------------------------------

#[test]
fn test_monthly_breakdown_is_idempotent() {
    let transactions = snapshot(vec![
        income(dec!(900), Category::Salary, "2024-01-31"),
        expense(dec!(12.30), Category::Food, "2024-02-01"),
        expense(dec!(4), Category::Transport, "2024-02-14"),
    ]);
    let before = transactions.clone();

    let first = monthly_breakdown(&transactions);
    let second = monthly_breakdown(&transactions);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(transactions, before);
}

#[test]
fn test_daily_series_is_idempotent() {
    let transactions = snapshot(vec![
        income(dec!(50), Category::Gifts, "2024-05-01"),
        expense(dec!(20), Category::Leisure, "2024-05-03"),
    ]);
    let before = transactions.clone();

    let first = daily_balance_series(&transactions);
    let second = daily_balance_series(&transactions);

    assert_eq!(first, second);
    assert_eq!(first.last().unwrap().balance, dec!(30));
    assert_eq!(transactions, before);
}

/// Records that bypassed validation, each carrying `Decimal::MAX`
fn oversized(inputs: Vec<TransactionInput>) -> Vec<Transaction> {
    let mut transactions = snapshot(inputs);
    for tx in transactions.iter_mut() {
        tx.amount = Decimal::MAX;
    }
    transactions
}

#[test]
fn test_views_saturate_on_oversized_amounts() {
    let transactions = oversized(vec![
        income(dec!(1), Category::Salary, "2024-06-01"),
        income(dec!(1), Category::Freelance, "2024-06-01"),
        expense(dec!(1), Category::Food, "2024-06-02"),
        expense(dec!(1), Category::Food, "2024-06-02"),
    ]);
    let palette = CategoryPalette::default();

    let incomes: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.tx_type == TransactionType::Income)
        .collect();
    let slices = aggregate_by_category(incomes, &palette);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].amount, Decimal::MAX);

    let months = monthly_breakdown(&transactions);
    assert_eq!(months[0].incomes, Decimal::MAX);
    assert_eq!(months[0].expenses, Decimal::MAX);
    assert_eq!(months[0].balance, Decimal::ZERO);

    let series = daily_balance_series(&transactions);
    assert_eq!(series[0].balance, Decimal::MAX);
    assert_eq!(series[1].change, Decimal::MIN);
    assert_eq!(series[1].balance, Decimal::ZERO);

    let report = StatsReport::build(&transactions, &palette, 12);
    assert_eq!(report.expenses_by_category[0].percentage, 100);
}
