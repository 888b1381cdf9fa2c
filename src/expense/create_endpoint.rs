//! Defines the endpoint for creating a new expense.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    expense::{Expense, ExpensePayload, ExpenseState, create_expense},
};

/// A route handler for creating a new expense owned by the caller.
///
/// Responds with `201 Created` and the stored expense.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Response {
    match create(&state, &user_id, payload) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(error) => error.into_failure_response("Failed to create expense"),
    }
}

fn create(
    state: &ExpenseState,
    user_id: &UserID,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Expense, Error> {
    let Json(payload) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let builder = payload.validate()?;

    let connection = state.connection()?;
    let expense = create_expense(builder, user_id, &connection)?;

    tracing::info!(expense_id = expense.id, %user_id, "created expense");

    Ok(expense)
}
