use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error, db::lock_connection};

/// The state needed to list, create, read, replace and delete expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl ExpenseState {
    /// Lock the shared database connection.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        lock_connection(&self.db_connection)
    }
}
