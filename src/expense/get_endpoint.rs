//! Defines the endpoint for reading a single expense.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    expense::{Expense, ExpenseState, get_owned_expense, parse_expense_id},
};

/// A route handler that responds with one of the caller's expenses.
///
/// Expenses that do not exist and expenses owned by other users both get a
/// `404 Not Found`.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<String>,
) -> Response {
    match get(&state, &user_id, &expense_id) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_failure_response("Failed to fetch expense"),
    }
}

fn get(state: &ExpenseState, user_id: &UserID, expense_id: &str) -> Result<Expense, Error> {
    let expense_id = parse_expense_id(expense_id)?;
    let connection = state.connection()?;

    get_owned_expense(expense_id, user_id, &connection)
}
