use std::{env, fs::OpenOptions, net::SocketAddr, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The JSON API server for expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Asia/Jakarta".
    ///
    /// Used to pick the default month for the statistics.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// How many minutes a session stays valid after each authenticated request.
    #[arg(long, default_value_t = 30)]
    cookie_minutes: i64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let secret = env::var("SECRET").unwrap_or_else(|_| {
        tracing::error!("The environment variable 'SECRET' must be set");
        exit(1);
    });

    let conn = Connection::open(&args.db_path).unwrap_or_else(|error| {
        tracing::error!("Could not open the database at {}: {error}", args.db_path);
        exit(1);
    });

    let state = match AppState::new(conn, &secret, &args.timezone) {
        Ok(state) => state.with_cookie_duration(Duration::minutes(args.cookie_minutes)),
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG)
        });

    let (debug_log, log_file_error) = match debug_log {
        Ok(layer) => (Some(layer), None),
        Err(error) => (None, Some(error)),
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    if let Some(error) = log_file_error {
        tracing::warn!("Could not open debug.log, logging to stdout only: {error}");
    }
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
