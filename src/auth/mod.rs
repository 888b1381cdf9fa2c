//! Session verification for requests from the identity provider's users.
//!
//! Log-in and session issuance happen outside this service. The identity
//! provider hands the browser an encrypted private cookie holding a [Token],
//! and [auth_guard] turns a valid cookie into an explicit [UserID] for the
//! route handlers.

mod cookie;
mod middleware;
mod token;
mod user;

pub use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
    get_token_from_cookies, set_auth_cookie,
};
pub use middleware::{AuthState, auth_guard};
pub use token::Token;
pub use user::UserID;
