//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{StatusCode, request, response},
    middleware::Next,
    response::Response,
};

use crate::render_error;

/// Bodies longer than this many bytes are truncated in the `info` level logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body that will be read, the same as axum's default body limit.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Bodies are passed on byte for byte. Requests with a body larger than
/// [REQUEST_BODY_LIMIT] bytes are answered with `413 Payload Too Large`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return render_error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
    };
    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a character.
fn truncate(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {:}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {:}...",
            parts.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Bytes,
        http::StatusCode,
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        endpoints,
        expense::Expense,
        test_utils::{get_test_app, get_test_app_state, log_in},
    };

    use super::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware, truncate};

    fn get_logged_test_server() -> TestServer {
        let app = get_test_app(get_test_app_state()).layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn truncates_long_bodies() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        assert_eq!(truncate(&body).len(), LOG_BODY_LENGTH_LIMIT);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn truncation_keeps_whole_characters() {
        let body = format!("{}é", "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));

        assert_eq!(truncate(&body), "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 3);

        let response = server.post("/echo").text(body.clone()).await;

        response.assert_status_ok();
        response.assert_text(body);
    }

    #[tokio::test]
    async fn invalid_utf8_body_reaches_handler_unchanged() {
        let server = get_logged_test_server();
        let alice = log_in(&server, "alice").await;
        let body = Bytes::from_static(
            b"{\"title\":\"Lunch \xFF\",\"amount\":5,\"date\":\"2025-03-10\",\"category\":\"FOOD\"}",
        );

        let response = server
            .post(endpoints::EXPENSES)
            .add_cookie(alice.clone())
            .content_type("application/json")
            .bytes(body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid request body" }));
        let stored = server
            .get(endpoints::EXPENSES)
            .add_cookie(alice)
            .await
            .json::<Vec<Expense>>();
        assert!(stored.is_empty(), "want nothing stored, got {stored:?}");
    }

    #[tokio::test]
    async fn rejects_body_over_limit() {
        let server = get_logged_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .text("a".repeat(REQUEST_BODY_LIMIT + 1))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({ "error": "Request body too large" }));
    }
}
