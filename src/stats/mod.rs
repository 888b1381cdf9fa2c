//! Monthly spending statistics for the dashboard.
//!
//! [compute_monthly_stats] reduces a month's expenses to the figures shown on
//! the dashboard, and [get_monthly_stats_endpoint] serves them for the caller.

mod endpoint;

use std::collections::BTreeMap;

use serde::Serialize;
use time::Month;

use crate::expense::{Category, Expense, query::last_day_of_month};

pub use endpoint::{StatsQuery, StatsState, get_monthly_stats_endpoint};

/// The share of this month's total used as last month's total.
///
/// This is a stand-in until previous months are actually compared, so every
/// non-empty month trends up by the same percentage.
const BASELINE_RATIO: f64 = 0.9;

/// Whether spending went up or down compared to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// More was spent than the baseline.
    Up,
    /// Less was spent than the baseline.
    Down,
    /// Exactly the baseline was spent.
    Stable,
}

/// Aggregate figures for one month of expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// The sum of all amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
    /// The summed amount for each category that has at least one expense.
    pub by_category: BTreeMap<Category, f64>,
    /// The total spread over every day of the month.
    pub daily_average: f64,
    /// The direction of spending compared to the baseline.
    pub trend: Trend,
    /// How far the total is from the baseline, in percent, to one decimal place.
    pub trend_percentage: f64,
}

/// The number of days in `month` of `year`.
pub fn days_in_month(month: Month, year: i32) -> u8 {
    last_day_of_month(year, month)
}

/// Compute the statistics for `expenses`, which should all fall in `month` of `year`.
///
/// The total is accumulated category by category, in the order categories
/// are reported, so summing `by_category` in order gives exactly `total`.
pub fn compute_monthly_stats(expenses: &[Expense], month: Month, year: i32) -> MonthlyStats {
    let mut by_category = BTreeMap::new();

    for expense in expenses {
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let total = by_category.values().fold(0.0, |total, amount| total + amount);

    let daily_average = if expenses.is_empty() {
        0.0
    } else {
        total / f64::from(days_in_month(month, year))
    };

    let baseline = total * BASELINE_RATIO;
    let trend = if total > baseline {
        Trend::Up
    } else if total < baseline {
        Trend::Down
    } else {
        Trend::Stable
    };

    let trend_percentage = if baseline == 0.0 {
        0.0
    } else {
        round_to_one_decimal(((total - baseline) / baseline * 100.0).abs())
    };

    MonthlyStats {
        total,
        count: expenses.len(),
        by_category,
        daily_average,
        trend,
        trend_percentage,
    }
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
