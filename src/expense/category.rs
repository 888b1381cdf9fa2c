//! The fixed set of expense categories.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

/// What an expense was spent on.
///
/// The order of the variants is the order categories are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Groceries, meals and snacks.
    Food,
    /// Fares, fuel and parking.
    Transportation,
    /// Outings, subscriptions and hobbies.
    Entertainment,
    /// Utilities, rent and other recurring charges.
    Bills,
    /// Anything that does not fit elsewhere.
    Others,
}

impl Category {
    /// Every category, in reporting order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Bills,
        Category::Others,
    ];

    /// The category's wire and storage name, e.g. "FOOD".
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Transportation => "TRANSPORTATION",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Bills => "BILLS",
            Category::Others => "OTHERS",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string is not the exact name of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory;

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parse a category name. Matching is exact, so "food" is not a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(UnknownCategory)
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::Category;

    #[test]
    fn parses_exact_names_only() {
        assert_eq!("FOOD".parse::<Category>(), Ok(Category::Food));
        assert_eq!("BILLS".parse::<Category>(), Ok(Category::Bills));
        assert!("food".parse::<Category>().is_err());
        assert!(" FOOD".parse::<Category>().is_err());
        assert!("GROCERIES".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_as_upper_case_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();

            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn round_trips_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();

        let got: Category = conn
            .query_row("SELECT ?1", [Category::Entertainment], |row| row.get(0))
            .unwrap();

        assert_eq!(got, Category::Entertainment);
    }

    #[test]
    fn unknown_stored_value_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();

        let got = conn.query_row("SELECT 'SNACKS'", [], |row| row.get::<_, Category>(0));

        assert!(got.is_err());
    }
}
