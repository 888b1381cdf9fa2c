//! Parses and validates the JSON body sent to create or replace an expense.

use serde::Deserialize;
use serde_json::Value;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339};

use crate::expense::{Category, Expense, ExpenseBuilder, core::date_format::DATE_FORMAT};

/// The rule a request broke.
///
/// The message of each variant is sent to the client as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One of title, amount, date or category was missing or empty.
    #[error("Missing required fields")]
    MissingRequiredFields,

    /// The amount was not a finite number greater than zero.
    #[error("Amount must be a positive number")]
    InvalidAmount,

    /// The category was not one of the fixed set of categories.
    #[error("Invalid category")]
    InvalidCategory,

    /// The date was neither a calendar date nor an RFC 3339 date time.
    #[error("Invalid date")]
    InvalidDate,

    /// The title was given but was not a string, e.g. a number.
    #[error("Title must be text")]
    InvalidTitle,

    /// An explicit month or year query parameter was not a valid month.
    #[error("Invalid month or year")]
    InvalidPeriod,
}

/// The body of a create or replace request.
///
/// Fields are kept as raw JSON so that a missing field, an empty string and a
/// wrongly typed value can each be reported with the right message.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensePayload {
    /// A short label for the expense.
    #[serde(default)]
    pub title: Option<Value>,
    /// A number or a numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// A "YYYY-MM-DD" date or an RFC 3339 date time.
    #[serde(default)]
    pub date: Option<Value>,
    /// One of the category names, e.g. "FOOD".
    #[serde(default)]
    pub category: Option<Value>,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<Value>,
}

impl ExpensePayload {
    /// Check the payload and turn it into an [ExpenseBuilder].
    ///
    /// Rules are checked in order and the first one broken is returned:
    /// required fields, then amount, then category, then date, then title.
    ///
    /// # Errors
    /// Returns the [ValidationError] for the first rule the payload breaks.
    pub fn validate(self) -> Result<ExpenseBuilder, ValidationError> {
        let (Some(title), Some(amount), Some(date), Some(category)) = (
            present(self.title),
            present(self.amount),
            present(self.date),
            present(self.category),
        ) else {
            return Err(ValidationError::MissingRequiredFields);
        };

        let amount = parse_amount(&amount).ok_or(ValidationError::InvalidAmount)?;

        let category = category
            .as_str()
            .and_then(|category| category.parse::<Category>().ok())
            .ok_or(ValidationError::InvalidCategory)?;

        let date = date
            .as_str()
            .and_then(parse_date)
            .ok_or(ValidationError::InvalidDate)?;

        let title = title
            .as_str()
            .map(|title| title.trim().to_owned())
            .ok_or(ValidationError::InvalidTitle)?;

        let description = match self.description {
            Some(Value::String(description)) if !description.trim().is_empty() => {
                Some(description.trim().to_owned())
            }
            _ => None,
        };

        Ok(Expense::build(&title, amount, date, category).description(description))
    }
}

/// `Some(value)` unless `value` is absent or empty: null, false, zero or a blank string.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Parse a positive, finite amount from a JSON number or a numeric string.
fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT)
        .or_else(|_| OffsetDateTime::parse(text, &Rfc3339).map(|date_time| date_time.date()))
        .ok()
}
