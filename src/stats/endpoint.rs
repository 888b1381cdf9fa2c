//! Defines the endpoint that serves the caller's monthly statistics.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    auth::UserID,
    db::lock_connection,
    expense::{
        ExpenseFilter, ValidationError, list_expenses,
        query::{month_range, parse_month, parse_year},
    },
    stats::{MonthlyStats, compute_monthly_stats},
    timezone::get_local_date,
};

/// The state needed to compute monthly statistics.
#[derive(Debug, Clone)]
pub struct StatsState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl StatsState {
    /// Lock the shared database connection.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        lock_connection(&self.db_connection)
    }
}

/// The query string accepted by the statistics endpoint.
///
/// Each of `month` and `year` defaults to the current one in the server's
/// local timezone.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// The month, 1 to 12.
    pub month: Option<String>,
    /// The year, e.g. 2025.
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    month: u8,
    year: i32,
    #[serde(flatten)]
    stats: MonthlyStats,
}

/// A route handler that responds with the caller's statistics for one month.
///
/// A query string that cannot be parsed, e.g. one that repeats `month`, is
/// rejected like an invalid month.
pub async fn get_monthly_stats_endpoint(
    State(state): State<StatsState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("could not parse statistics query: {rejection}");
            return Error::from(ValidationError::InvalidPeriod)
                .into_failure_response("Failed to compute statistics");
        }
    };

    match get_stats(&state, &user_id, &query) {
        Ok(stats) => Json(stats).into_response(),
        Err(error) => error.into_failure_response("Failed to compute statistics"),
    }
}

fn get_stats(
    state: &StatsState,
    user_id: &UserID,
    query: &StatsQuery,
) -> Result<StatsResponse, Error> {
    let (month, year) = resolve_period(query, &state.local_timezone)?;
    let filter = ExpenseFilter {
        date_range: Some(month_range(year, month).ok_or(ValidationError::InvalidPeriod)?),
        category: None,
    };

    let connection = state.connection()?;
    let expenses = list_expenses(&filter, user_id, &connection)?;

    Ok(StatsResponse {
        month: u8::from(month),
        year,
        stats: compute_monthly_stats(&expenses, month, year),
    })
}

/// Use the month and year from `query`, filling in whichever is missing from today's date.
fn resolve_period(query: &StatsQuery, local_timezone: &str) -> Result<(Month, i32), Error> {
    let today = get_local_date(local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(local_timezone.to_owned()))?;

    let month = match query.month.as_deref() {
        Some(text) => parse_month(text).ok_or(ValidationError::InvalidPeriod)?,
        None => today.month(),
    };
    let year = match query.year.as_deref() {
        Some(text) => parse_year(text).ok_or(ValidationError::InvalidPeriod)?,
        None => today.year(),
    };

    Ok((month, year))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::OffsetDateTime;

    use crate::{
        endpoints,
        test_utils::{get_test_app_state, get_test_server, log_in},
    };

    use super::{StatsQuery, resolve_period};

    #[tokio::test]
    async fn computes_stats_for_requested_month() {
        let server = get_test_server(get_test_app_state());
        let alice = log_in(&server, "alice").await;
        let bob = log_in(&server, "bob").await;
        for (user, amount, date, category) in [
            (&alice, 60, "2024-02-01", "FOOD"),
            (&alice, 30, "2024-02-29", "BILLS"),
            (&alice, 40, "2024-02-15", "FOOD"),
            (&alice, 999, "2024-03-01", "FOOD"),
            (&bob, 555, "2024-02-10", "FOOD"),
        ] {
            server
                .post(endpoints::EXPENSES)
                .add_cookie(user.clone())
                .json(&json!({ "title": "Test", "amount": amount, "date": date, "category": category }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::EXPENSE_STATS)
            .add_query_param("month", 2)
            .add_query_param("year", 2024)
            .add_cookie(alice)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "month": 2,
            "year": 2024,
            "total": 130.0,
            "count": 3,
            "byCategory": { "FOOD": 100.0, "BILLS": 30.0 },
            "dailyAverage": 130.0 / 29.0,
            "trend": "up",
            "trendPercentage": 11.1,
        }));
    }

    #[tokio::test]
    async fn defaults_to_current_month() {
        let server = get_test_server(get_test_app_state());
        let alice = log_in(&server, "alice").await;
        let today = OffsetDateTime::now_utc().date();

        let body = server
            .get(endpoints::EXPENSE_STATS)
            .add_cookie(alice)
            .await
            .json::<Value>();

        assert_eq!(body["month"], u8::from(today.month()));
        assert_eq!(body["year"], today.year());
        assert_eq!(body["count"], 0);
        assert_eq!(body["trend"], "stable");
        assert_eq!(body["trendPercentage"], 0.0);
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let server = get_test_server(get_test_app_state());
        let alice = log_in(&server, "alice").await;

        let response = server
            .get(endpoints::EXPENSE_STATS)
            .add_query_param("month", 13)
            .add_cookie(alice)
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Invalid month or year" }));
    }

    #[tokio::test]
    async fn repeated_month_is_json_bad_request() {
        let server = get_test_server(get_test_app_state());
        let alice = log_in(&server, "alice").await;

        let response = server
            .get(endpoints::EXPENSE_STATS)
            .add_query_param("month", 2)
            .add_query_param("month", 3)
            .add_cookie(alice)
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Invalid month or year" }));
    }

    #[tokio::test]
    async fn requires_session() {
        let server = get_test_server(get_test_app_state());

        let response = server.get(endpoints::EXPENSE_STATS).await;

        response.assert_status_unauthorized();
    }

    #[test]
    fn missing_year_defaults_independently() {
        let query = StatsQuery {
            month: Some("7".to_owned()),
            year: None,
        };

        let (month, year) = resolve_period(&query, "Etc/UTC").unwrap();

        assert_eq!(month, time::Month::July);
        assert_eq!(year, OffsetDateTime::now_utc().year());
    }
}
