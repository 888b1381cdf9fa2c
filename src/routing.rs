//! Application router configuration with protected and unprotected route definitions.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState,
    auth::auth_guard,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_expense_endpoint, list_expenses_endpoint,
    },
    not_found::get_404_not_found,
    stats::get_monthly_stats_endpoint,
};

/// Return a router with all the app's routes.
///
/// Every expense route needs a valid session cookie. Requests to unknown
/// routes get a JSON 404 whether or not they carry a session.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_STATS, get(get_monthly_stats_endpoint))
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(edit_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .fallback(get_404_not_found)
        .with_state(state)
}
