//! Sets up the application's SQLite database.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, expense::create_expense_table};

/// Create all of the application's tables and indexes.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Lock the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::Error;

    use super::{initialize, lock_connection};

    #[test]
    fn poisoned_lock_is_database_lock_error() {
        let db_connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let poisoner = db_connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let got = lock_connection(&db_connection);

        assert!(matches!(got, Err(Error::DatabaseLockError)));
    }

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialize failed");
        initialize(&conn).expect("second initialize failed");
    }

    #[test]
    fn creates_expense_table() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'expense'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 1);
    }
}
