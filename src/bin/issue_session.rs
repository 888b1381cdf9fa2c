use std::{env, error::Error, process::exit};

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use clap::Parser;
use time::Duration;

use expense_tracker::{
    auth::{UserID, set_auth_cookie},
    create_cookie_key,
};

/// Print a session cookie for a user, as the identity provider would issue it.
///
/// Reads the cookie secret from the `SECRET` environment variable, which must
/// match the one the server was started with.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The identity provider's ID for the user.
    #[arg(long)]
    user_id: String,

    /// How many minutes the session stays valid.
    #[arg(long, default_value_t = 30)]
    minutes: i64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let Ok(secret) = env::var("SECRET") else {
        eprintln!("The environment variable 'SECRET' must be set");
        exit(1);
    };

    let jar = PrivateCookieJar::new(create_cookie_key(&secret));
    let jar = set_auth_cookie(
        jar,
        UserID::new(args.user_id),
        Duration::minutes(args.minutes),
    )?;

    for cookie in jar.into_response().headers().get_all(SET_COOKIE) {
        println!("{}", cookie.to_str()?);
    }

    Ok(())
}
