//! Defines the expense model and the database queries that read and write it.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, named_params};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, auth::UserID, database_id::DatabaseId, expense::Category};

/// The ID of an expense.
pub type ExpenseId = DatabaseId;

/// Parse an expense ID taken from a request path.
///
/// # Errors
/// Returns [Error::NotFound] if `text` is not an ID, since no expense can have it.
pub fn parse_expense_id(text: &str) -> Result<ExpenseId, Error> {
    text.parse().map_err(|_| Error::NotFound)
}

pub(crate) mod date_format {
    //! Serializes a [time::Date] as a plain calendar date, e.g. "2025-03-10".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
        format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// MODELS
// ============================================================================

/// A single spending entry owned by one user.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A short label for the expense, e.g. "Lunch".
    pub title: String,
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// The day the money was spent.
    #[serde(with = "date_format")]
    pub date: Date,
    /// What the money was spent on.
    pub category: Category,
    /// Optional free text with more detail.
    pub description: Option<String>,
    /// The user the expense belongs to.
    pub user_id: UserID,
    /// When the expense was first stored.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the expense was last replaced.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(title: &str, amount: f64, date: Date, category: Category) -> ExpenseBuilder {
        ExpenseBuilder {
            title: title.to_owned(),
            amount,
            date,
            category,
            description: None,
        }
    }
}

/// The user-supplied fields of an [Expense].
///
/// Builders coming from a request are produced by
/// [ExpensePayload::validate](crate::expense::ExpensePayload::validate), which
/// guarantees the title is trimmed and non-empty and the amount is positive.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::expense::{Category, Expense};
///
/// let lunch = Expense::build("Lunch", 50_000.0, date!(2025-03-10), Category::Food)
///     .description(Some("Nasi goreng".to_owned()));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    /// A short label for the expense.
    pub title: String,
    /// How much was spent.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// What the money was spent on.
    pub category: Category,
    /// Optional free text with more detail.
    pub description: Option<String>,
}

impl ExpenseBuilder {
    /// Set the description for the expense.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str =
    "id, title, amount, date, category, description, user_id, created_at, updated_at";

/// Store a new expense owned by `user_id`.
///
/// Both timestamps are set to the current time.
///
/// # Errors
/// This function will return a [Error::SqlError] if the expense could not be inserted.
pub fn create_expense(
    builder: ExpenseBuilder,
    user_id: &UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();

    let expense = connection
        .prepare(&format!(
            "INSERT INTO expense (title, amount, date, category, description, user_id, created_at, updated_at)
             VALUES (:title, :amount, :date, :category, :description, :user_id, :now, :now)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_one(
            named_params! {
                ":title": builder.title,
                ":amount": builder.amount,
                ":date": builder.date,
                ":category": builder.category,
                ":description": builder.description,
                ":user_id": user_id,
                ":now": now,
            },
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve the expense `id` if, and only if, it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense or the expense belongs to someone else,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_owned_expense(
    id: ExpenseId,
    user_id: &UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            named_params! { ":id": id, ":user_id": user_id },
            map_expense_row,
        )?;

    Ok(expense)
}

/// Replace the user-supplied fields of the expense `id` owned by `user_id`.
///
/// The ownership check and the write happen in one database transaction.
/// The ID, owner and creation time are kept and the update time is set to now.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_owned_expense(
    id: ExpenseId,
    builder: ExpenseBuilder,
    user_id: &UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    get_owned_expense(id, user_id, &transaction)?;

    let expense = transaction
        .prepare(&format!(
            "UPDATE expense
             SET title = :title,
                 amount = :amount,
                 date = :date,
                 category = :category,
                 description = :description,
                 updated_at = :updated_at
             WHERE id = :id AND user_id = :user_id
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_one(
            named_params! {
                ":title": builder.title,
                ":amount": builder.amount,
                ":date": builder.date,
                ":category": builder.category,
                ":description": builder.description,
                ":updated_at": OffsetDateTime::now_utc(),
                ":id": id,
                ":user_id": user_id,
            },
            map_expense_row,
        )?;

    transaction.commit()?;

    Ok(expense)
}

/// Delete the expense `id` owned by `user_id`.
///
/// The ownership check and the delete happen in one database transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_owned_expense(
    id: ExpenseId,
    user_id: &UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    get_owned_expense(id, user_id, &transaction)?;

    let rows_affected = transaction.execute(
        "DELETE FROM expense WHERE id = :id AND user_id = :user_id",
        named_params! { ":id": id, ":user_id": user_id },
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                category TEXT NOT NULL
                    CHECK (category IN ('FOOD', 'TRANSPORTATION', 'ENTERTAINMENT', 'BILLS', 'OTHERS')),
                description TEXT,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query is scoped to one user, and the list is filtered and sorted by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Expense.
///
/// The row must hold the columns in the order `id, title, amount, date,
/// category, description, user_id, created_at, updated_at`.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        user_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
