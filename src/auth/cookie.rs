//! Defines functions for reading, writing and extending the session cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{Token, UserID},
};

/// The name of the cookie that holds the session token.
pub const COOKIE_TOKEN: &str = "auth_token";

/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Add a session cookie to the cookie jar, indicating that `user_id` is authenticated.
///
/// Sets the expiry of the session to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// # Errors
///
/// Returns a [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: OffsetDateTime::now_utc() + duration,
    };

    set_token_cookie(jar, &token)
}

/// Read the session token from `jar`.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if the cookie is missing, the token cannot
/// be parsed, or the token expired before `now`.
pub fn get_token_from_cookies(
    jar: &PrivateCookieJar,
    now: OffsetDateTime,
) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthenticated)?;

    let token: Token = serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::debug!("could not parse session token: {error}");
        Error::Unauthenticated
    })?;

    if token.is_expired(now) {
        return Err(Error::Unauthenticated);
    }

    Ok(token)
}

/// Set the expiry of the session in `jar` to the latest of UTC now plus
/// `duration` and the session's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::Unauthenticated] if there is no valid session in the cookie jar.
/// - [Error::InvalidSessionExpiry] if extending the session by `duration` would overflow the date time.
/// - [Error::JSONSerializationError] if the updated token cannot be serialized.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let now = OffsetDateTime::now_utc();
    let token = get_token_from_cookies(&jar, now)?;

    let new_expiry = now
        .checked_add(duration)
        .ok_or(Error::InvalidSessionExpiry)?;

    let token = Token {
        expires_at: max(token.expires_at, new_expiry),
        ..token
    };

    set_token_cookie(jar, &token)
}

fn set_token_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .path("/")
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}
