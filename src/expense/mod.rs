//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model, the `Category` enum and `ExpenseBuilder` for creating expenses
//! - Validation of the JSON bodies sent by clients
//! - Database functions for storing, querying, and managing expenses, always scoped to one user
//! - Route handlers for the expense endpoints

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod list_endpoint;
pub(crate) mod query;
mod state;

pub use category::{Category, UnknownCategory};
pub use self::core::{
    Expense, ExpenseBuilder, ExpenseId, create_expense, create_expense_table,
    delete_owned_expense, get_owned_expense, map_expense_row, parse_expense_id,
    update_owned_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use form::{ExpensePayload, ValidationError};
pub use get_endpoint::get_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use query::{DateRange, ExpenseFilter, ListQuery, list_expenses};
pub use state::ExpenseState;
