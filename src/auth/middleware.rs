//! Authentication middleware that validates the session cookie and extends sessions.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key used to decrypt and verify private cookies.
    pub cookie_key: Key,
    /// How much session time each authenticated request guarantees is left.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
///
/// The caller's [UserID](crate::auth::UserID) is placed into the request
/// extensions and the request executed normally if the session is valid,
/// otherwise a 401 response is returned before the handler runs.
///
/// After the handler runs, the session is extended so that it expires no
/// sooner than [AuthState::cookie_duration] from now.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and verifying the cookie contents.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}");
            return Error::Unauthenticated.into_response();
        }
    };

    let user_id = match get_token_from_cookies(&jar, OffsetDateTime::now_utc()) {
        Ok(token) => token.user_id,
        Err(error) => return error.into_response(),
    };

    tracing::debug!(%user_id, "authenticated request");
    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::Path,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::{AuthState, COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, UserID, auth_guard, set_auth_cookie},
    };

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    /// Sessions issued by the stub are shorter than any extension used below.
    const ISSUED_SESSION_DURATION: Duration = Duration::seconds(5);

    async fn stub_log_in_route(
        Path(user_id): Path<String>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(user_id), ISSUED_SESSION_DURATION)
    }

    const TEST_LOG_IN_ROUTE_PATH: &str = "/log_in/{user_id}";
    const TEST_PROTECTED_ROUTE: &str = "/protected";

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = AuthState {
            cookie_key: Key::from(&hash),
            cookie_duration,
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_LOG_IN_ROUTE_PATH, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_cookie() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let response = server.post("/log_in/alice").await;

        response.assert_status_ok();
        let token_cookie = response.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("alice");
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {:?}, want {:?}",
            left,
            right
        );
    }

    #[tokio::test]
    async fn auth_guard_extends_sessions_by_configured_duration() {
        let server = get_test_server(Duration::minutes(10));
        let response = server.post("/log_in/alice").await;

        response.assert_status_ok();
        let response_time = OffsetDateTime::now_utc();
        let token_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            token_cookie.expires_datetime().unwrap(),
            response_time + ISSUED_SESSION_DURATION,
        );

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        let auth_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            auth_cookie.expires_datetime().unwrap(),
            response_time + Duration::minutes(10),
        );
        assert_eq!(auth_cookie.secure(), Some(true));
        assert_eq!(auth_cookie.http_only(), Some(true));
        assert_eq!(auth_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn get_protected_route_with_no_cookie_is_unauthorized() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_unauthorized();
        response.assert_json(&serde_json::json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn get_protected_route_with_invalid_cookie_is_unauthorized() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build())
            .await;

        response.assert_status_unauthorized();
    }
}
