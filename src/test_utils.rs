#![allow(missing_docs)]

use axum::{Router, extract::Path, routing::post};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{COOKIE_TOKEN, UserID, set_auth_cookie},
    build_router,
};

const TEST_LOG_IN_ROUTE: &str = "/test/log_in/{user_id}";

pub(crate) fn get_test_app_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(conn, "42", "Etc/UTC").expect("Could not create app state.")
}

/// How long the sessions issued by the stub log-in route last.
pub(crate) const TEST_SESSION_DURATION: Duration = Duration::minutes(1);

/// Stands in for the identity provider by issuing a session for any user ID.
async fn stub_log_in_route(
    Path(user_id): Path<String>,
    jar: PrivateCookieJar,
) -> Result<PrivateCookieJar, Error> {
    set_auth_cookie(jar, UserID::new(user_id), TEST_SESSION_DURATION)
}

/// The app's routes plus a route that logs in any user.
pub(crate) fn get_test_app(state: AppState) -> Router {
    let log_in_route = Router::new()
        .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
        .with_state(state.clone());

    build_router(state).merge(log_in_route)
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(get_test_app(state)).expect("Could not create test server.")
}

/// Get a session cookie for `user_id`.
pub(crate) async fn log_in(server: &TestServer, user_id: &str) -> Cookie<'static> {
    let response = server.post(&format!("/test/log_in/{user_id}")).await;
    response.assert_status_ok();

    response.cookie(COOKIE_TOKEN)
}
