use axum::{http::StatusCode, response::Response};

use crate::render_error;

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    render_error(StatusCode::NOT_FOUND, "Not found")
}
