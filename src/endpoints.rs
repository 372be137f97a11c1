//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/tables/{table_id}', use [format_endpoint].

use crate::budget_table::BudgetTableId;

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page with the month by month grid for one table.
pub const MONTHLY_VIEW: &str = "/monthly";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create users.
pub const USERS: &str = "/api/users";
/// The route to create a budget table.
pub const TABLES_API: &str = "/api/tables";
/// The route to delete a budget table.
pub const TABLE: &str = "/api/tables/{table_id}";
/// The route to get the monthly roll-up of a table as JSON.
pub const TABLE_MONTHLY: &str = "/api/tables/{table_id}/monthly";
/// The route to get the dashboard summary of a table as JSON.
pub const TABLE_SUMMARY: &str = "/api/tables/{table_id}/summary";
/// The route to create a category.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to rename or delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create or add to a monthly entry.
pub const ENTRIES_API: &str = "/api/entries";
/// The route to read and store the table the user last looked at.
pub const SELECTED_TABLE: &str = "/api/selected_table";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/tables/{table_id}', '{table_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_owned(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// The URL of the monthly page with `table_id` selected.
pub fn monthly_view_for(table_id: BudgetTableId) -> String {
    format!("{MONTHLY_VIEW}?table={table_id}")
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::{format_endpoint, monthly_view_for};

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::MONTHLY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::TABLES_API);
        assert_endpoint_is_valid_uri(endpoints::TABLE);
        assert_endpoint_is_valid_uri(endpoints::TABLE_MONTHLY);
        assert_endpoint_is_valid_uri(endpoints::TABLE_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_API);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::ENTRIES_API);
        assert_endpoint_is_valid_uri(endpoints::SELECTED_TABLE);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::TABLE_MONTHLY, 7);

        assert_eq!(formatted_path, "/api/tables/7/monthly");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn monthly_view_url_selects_table() {
        let url = monthly_view_for(12);

        assert_eq!(url, "/monthly?table=12");
        assert!(url.parse::<Uri>().is_ok());
    }
}
