//! Budget Tables is a web app for tracking a personal budget month by month.
//!
//! Users keep one table per year. Each table holds income and expense
//! categories, and each category holds one amount per month. The app rolls
//! those amounts up into monthly totals, a balance per month and a yearly
//! dashboard.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod budget_table;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod entry;
mod html;
mod internal_server_error;
mod logging;
mod money;
mod monthly_page;
mod navigation;
mod not_found;
mod rollup;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email, get_user_by_id,
};
pub use budget_table::{
    BudgetTable, BudgetTableId, create_budget_table, get_budget_table, get_budget_tables_for_user,
};
pub use category::{
    Category, CategoryKind, CategoryName, CategoryType, ExpenseSubtype, IncomeSubtype,
    get_categories_by_table,
};
pub use db::initialize as initialize_db;
pub use entry::{Entry, EntryId, UpsertMode, upsert_entry};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use rollup::{
    CategoryExpense, CategoryGroup, CategoryRollup, CategoryWithEntries, DashboardRollup,
    ExpenseBreakdown, ExpenseRollup, IncomeRollup, MonthlyRollup, MonthlyTotals, dashboard_rollup,
    load_categories_with_entries, monthly_rollup,
};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundPage};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address is already used by another user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The user already has a table for the year.
    #[error("a table for the year {0} already exists")]
    DuplicateBudgetTable(i32),

    /// The year is outside the range the app supports.
    #[error("{0} is not a valid year")]
    InvalidYear(i64),

    /// The table does not exist.
    #[error("the table could not be found")]
    BudgetTableNotFound,

    /// The table already has a category with the same name and type.
    #[error("a {category_type} category named \"{name}\" already exists in this table")]
    DuplicateCategory {
        /// The name that clashed.
        name: String,
        /// The type shared by both categories.
        category_type: CategoryType,
    },

    /// An empty string was used as a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category type is neither income nor expense.
    #[error("\"{0}\" is not a valid category type, expected \"income\" or \"expense\"")]
    InvalidCategoryType(String),

    /// The subtype does not exist for the category type.
    #[error("\"{subtype}\" is not a valid subtype for {category_type} categories")]
    InvalidSubtype {
        /// The type of the category being created.
        category_type: CategoryType,
        /// The rejected subtype.
        subtype: String,
    },

    /// The category does not exist.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// The category exists but belongs to a different table.
    #[error("the category does not belong to the table")]
    CategoryNotInTable,

    /// The month is not a number between 1 and 12.
    #[error("\"{0}\" is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(String),

    /// The amount is not a number or is too large to store.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The entry write mode is neither accumulate nor replace.
    #[error("\"{0}\" is not a valid mode, expected \"accumulate\" or \"replace\"")]
    InvalidUpsertMode(String),

    /// The user tried to read or change a table they do not own.
    #[error("you do not have permission to access this table")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The status code that best describes the error to an HTTP client.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateBudgetTable(_)
            | Error::DuplicateCategory { .. }
            | Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound | Error::BudgetTableNotFound | Error::CategoryNotFound => {
                StatusCode::NOT_FOUND
            }
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::InvalidCredentials | Error::CookieMissing => StatusCode::UNAUTHORIZED,
            Error::InvalidYear(_)
            | Error::EmptyCategoryName
            | Error::InvalidCategoryType(_)
            | Error::InvalidSubtype { .. }
            | Error::CategoryNotInTable
            | Error::InvalidMonth(_)
            | Error::InvalidAmount(_)
            | Error::InvalidUpsertMode(_)
            | Error::InvalidEmail(_)
            | Error::TooWeak(_) => StatusCode::BAD_REQUEST,
            Error::InvalidDateFormat(_, _)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as an alert fragment for HTMX requests.
    ///
    /// The alert names the field or resource that caused the error so the
    /// user can fix their input.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let (message, details) = match &self {
            Error::DuplicateBudgetTable(year) => (
                "Duplicate year".to_owned(),
                format!(
                    "A table for the year {year} already exists. \
                    Choose a different year, or open the existing table."
                ),
            ),
            Error::InvalidYear(_) => ("Invalid year".to_owned(), self.to_string()),
            Error::DuplicateCategory { .. } => (
                "Duplicate category name".to_owned(),
                format!("{self}. Choose a different name."),
            ),
            Error::EmptyCategoryName => ("Invalid category name".to_owned(), self.to_string()),
            Error::InvalidCategoryType(_) => ("Invalid category type".to_owned(), self.to_string()),
            Error::InvalidSubtype { .. } => {
                ("Invalid category subtype".to_owned(), self.to_string())
            }
            Error::InvalidMonth(_) => ("Invalid month".to_owned(), self.to_string()),
            Error::InvalidAmount(_) => (
                "Invalid amount".to_owned(),
                format!("{self}. Enter a number such as 1200 or 35.50."),
            ),
            Error::InvalidUpsertMode(_) => ("Invalid mode".to_owned(), self.to_string()),
            Error::CategoryNotInTable => ("Invalid category".to_owned(), self.to_string()),
            Error::BudgetTableNotFound | Error::NotFound => (
                "Could not find table".to_owned(),
                "The table could not be found. \
                Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            ),
            Error::CategoryNotFound => (
                "Could not find category".to_owned(),
                "The category could not be found. \
                Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            ),
            Error::Forbidden => ("Permission denied".to_owned(), self.to_string()),
            Error::InvalidTimezoneError(timezone) => (
                "Invalid Timezone Settings".to_owned(),
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    "Something went wrong".to_owned(),
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status_code, Alert::Error { message, details }.into_html()).into_response()
    }

    /// Render the error as a JSON body of the form `{"error": "..."}`.
    ///
    /// Server side errors are logged and replaced with a generic message.
    pub fn into_json_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {self}");
            "An unexpected error occurred".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::BudgetTableNotFound | Error::CategoryNotFound => {
                NotFoundPage.into_response()
            }
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                InternalServerError {
                    description: "Permission denied",
                    fix: "You do not have access to this table. Pick one of your own tables.",
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
