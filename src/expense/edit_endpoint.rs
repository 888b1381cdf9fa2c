//! Defines the endpoint for replacing an expense.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    expense::{Expense, ExpensePayload, ExpenseState, parse_expense_id, update_owned_expense},
};

/// A route handler that replaces the fields of one of the caller's expenses.
///
/// The body is validated with the same rules as creating an expense before
/// the expense is looked up.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<String>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Response {
    match edit(&state, &user_id, &expense_id, payload) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_failure_response("Failed to update expense"),
    }
}

fn edit(
    state: &ExpenseState,
    user_id: &UserID,
    expense_id: &str,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Expense, Error> {
    let expense_id = parse_expense_id(expense_id)?;
    let Json(payload) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let builder = payload.validate()?;

    let connection = state.connection()?;
    let expense = update_owned_expense(expense_id, builder, user_id, &connection)?;

    tracing::info!(expense_id, %user_id, "updated expense");

    Ok(expense)
}
