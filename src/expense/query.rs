//! Database query and filters for listing a user's expenses.

use rusqlite::{Connection, ToSql};
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    Error,
    auth::UserID,
    expense::{Category, Expense, core::map_expense_row},
};

/// The query string accepted by the list endpoint.
///
/// Values are kept as text so that a malformed filter is ignored instead of
/// rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// The month to show, 1 to 12. Only applied together with `year`.
    pub month: Option<String>,
    /// The year to show. Only applied together with `month`.
    pub year: Option<String>,
    /// The category to show, e.g. "FOOD".
    pub category: Option<String>,
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

/// The restrictions applied when listing expenses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only include expenses dated within this range.
    pub date_range: Option<DateRange>,
    /// Only include expenses in this category.
    pub category: Option<Category>,
}

impl From<&ListQuery> for ExpenseFilter {
    fn from(query: &ListQuery) -> Self {
        let month = query.month.as_deref().and_then(parse_month);
        let year = query.year.as_deref().and_then(parse_year);

        let date_range = match (year, month) {
            (Some(year), Some(month)) => month_range(year, month),
            _ => None,
        };

        Self {
            date_range,
            category: query
                .category
                .as_deref()
                .and_then(|category| category.parse().ok()),
        }
    }
}

/// Parse a month number from 1 to 12.
pub(crate) fn parse_month(text: &str) -> Option<Month> {
    text.trim()
        .parse::<u8>()
        .ok()
        .and_then(|month| Month::try_from(month).ok())
}

/// Parse a year that [month_range] can represent.
pub(crate) fn parse_year(text: &str) -> Option<i32> {
    let year = text.trim().parse::<i32>().ok()?;

    Date::from_calendar_date(year, Month::January, 1)
        .ok()
        .map(|_| year)
}

/// The first through the last day of `month` in `year`.
///
/// Returns `None` if the year is outside the supported date range.
pub(crate) fn month_range(year: i32, month: Month) -> Option<DateRange> {
    let start = Date::from_calendar_date(year, month, 1).ok()?;
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month)).ok()?;

    Some(DateRange { start, end })
}

/// The number of days in `month` of `year`.
pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Get the expenses owned by `user_id` that match `filter`.
///
/// Expenses are sorted newest date first. Expenses on the same date are
/// sorted most recently created first.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Expense row mapping fails
pub fn list_expenses(
    filter: &ExpenseFilter,
    user_id: &UserID,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let mut query = String::from(
        "SELECT id, title, amount, date, category, description, user_id, created_at, updated_at \
        FROM expense WHERE user_id = :user_id",
    );
    let mut params: Vec<(&str, &dyn ToSql)> = vec![(":user_id", user_id as &dyn ToSql)];

    if let Some(date_range) = &filter.date_range {
        query.push_str(" AND date BETWEEN :start AND :end");
        params.push((":start", &date_range.start as &dyn ToSql));
        params.push((":end", &date_range.end as &dyn ToSql));
    }

    if let Some(category) = &filter.category {
        query.push_str(" AND category = :category");
        params.push((":category", category as &dyn ToSql));
    }

    // Sort by ID after date so the order is stable.
    query.push_str(" ORDER BY date DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::from))
        .collect()
}
