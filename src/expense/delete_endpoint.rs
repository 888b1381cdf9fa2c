//! Defines the endpoint for deleting an expense.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    expense::{ExpenseState, delete_owned_expense, parse_expense_id},
};

#[derive(Debug, Serialize)]
struct DeletedMessage {
    message: &'static str,
}

/// A route handler that permanently deletes one of the caller's expenses.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<String>,
) -> Response {
    match delete(&state, &user_id, &expense_id) {
        Ok(()) => Json(DeletedMessage {
            message: "Expense deleted successfully",
        })
        .into_response(),
        Err(error) => error.into_failure_response("Failed to delete expense"),
    }
}

fn delete(state: &ExpenseState, user_id: &UserID, expense_id: &str) -> Result<(), Error> {
    let expense_id = parse_expense_id(expense_id)?;
    let connection = state.connection()?;

    delete_owned_expense(expense_id, user_id, &connection)?;

    tracing::info!(expense_id, %user_id, "deleted expense");

    Ok(())
}
