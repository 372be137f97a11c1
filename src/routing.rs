//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    budget_table::{
        create_table_endpoint, delete_table_endpoint, get_selected_table_endpoint,
        select_table_endpoint,
    },
    category::{create_category_endpoint, delete_category_endpoint, rename_category_endpoint},
    dashboard::get_dashboard_page,
    endpoints,
    entry::upsert_entry_endpoint,
    internal_server_error::get_internal_server_error_page,
    monthly_page::get_monthly_page,
    not_found::get_404_not_found,
    rollup::{get_dashboard_rollup_endpoint, get_monthly_rollup_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::MONTHLY_VIEW, get(get_monthly_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by HTMX, so they need the HX-Redirect header for
    // auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::TABLES_API, post(create_table_endpoint))
            .route(endpoints::TABLE, delete(delete_table_endpoint))
            .route(endpoints::TABLE_MONTHLY, get(get_monthly_rollup_endpoint))
            .route(endpoints::TABLE_SUMMARY, get(get_dashboard_rollup_endpoint))
            .route(
                endpoints::SELECTED_TABLE,
                get(get_selected_table_endpoint).post(select_table_endpoint),
            )
            .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
            .route(
                endpoints::CATEGORY,
                delete(delete_category_endpoint).put(rename_category_endpoint),
            )
            .route(endpoints::ENTRIES_API, post(upsert_entry_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
