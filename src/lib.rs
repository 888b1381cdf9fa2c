//! An expense tracker for recording discretionary spending.
//!
//! This library provides a JSON REST API for creating, listing, editing and
//! deleting a user's expenses, plus the monthly statistics shown on the
//! dashboard. Authentication is handled by an external identity provider;
//! this service only verifies the session cookie it issues.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
pub mod auth;
mod database_id;
mod db;
pub mod endpoints;
pub mod expense;
mod logging;
mod not_found;
mod routing;
pub mod stats;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::expense::ValidationError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid, unexpired session.
    #[error("no valid session in the request")]
    Unauthenticated,

    /// The client sent an expense that breaks one of the validation rules.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request body could not be parsed as JSON of the expected shape.
    ///
    /// The string holds the parser's message and is only logged.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// For expenses this also covers expenses that belong to another user, so
    /// that callers cannot learn whether someone else's expense exists.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Extending a session would move its expiry past the representable date range.
    #[error("the session expiry could not be extended")]
    InvalidSessionExpiry,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody<'a> {
    pub error: &'a str,
}

pub(crate) fn render_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_failure_response("Internal server error")
    }
}

impl Error {
    /// Convert the error into a JSON response.
    ///
    /// Client errors carry a message describing what went wrong. Every other
    /// error is logged and answered with the generic `failure_message`, so
    /// internal details never reach the client.
    pub(crate) fn into_failure_response(self, failure_message: &str) -> Response {
        match self {
            Error::Unauthenticated => render_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
            Error::Validation(error) => {
                render_error(StatusCode::BAD_REQUEST, &error.to_string())
            }
            Error::InvalidRequestBody(reason) => {
                tracing::debug!("rejected request body: {reason}");
                render_error(StatusCode::BAD_REQUEST, "Invalid request body")
            }
            Error::NotFound => render_error(StatusCode::NOT_FOUND, "Expense not found"),
            error => {
                tracing::error!("{failure_message}: {error}");
                render_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}
