//! Defines the endpoint for listing the caller's expenses.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    expense::{
        Expense, ExpenseState,
        query::{ExpenseFilter, ListQuery, list_expenses},
    },
};

/// A route handler that responds with the caller's expenses as a JSON array.
///
/// The optional `month`, `year` and `category` query parameters narrow the
/// list. Values that cannot be understood are ignored, as is a query string
/// that cannot be parsed at all, e.g. one that repeats a key.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("ignoring unparsable query string: {rejection}");
            ListQuery::default()
        }
    };

    match list(&state, &user_id, &query) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => error.into_failure_response("Failed to fetch expenses"),
    }
}

fn list(state: &ExpenseState, user_id: &UserID, query: &ListQuery) -> Result<Vec<Expense>, Error> {
    let filter = ExpenseFilter::from(query);
    let connection = state.connection()?;

    list_expenses(&filter, user_id, &connection)
}
