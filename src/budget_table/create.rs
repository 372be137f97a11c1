//! Budget table creation endpoint and form.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{UserID, set_selected_table_id},
    budget_table::{MAX_YEAR, MIN_YEAR, create_budget_table, validate_year},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
};

/// The state needed by the budget table endpoints.
#[derive(Debug, Clone)]
pub struct BudgetTableState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetTableState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for creating a budget table.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewTableForm {
    pub year: i64,
    pub name: Option<String>,
}

/// Render the form for creating a table, with `default_year` filled in.
pub fn new_table_form(default_year: i32) -> Markup {
    html! {
        form
            hx-post=(endpoints::TABLES_API)
            hx-target-error="#alert-container"
            hx-indicator="#new-table-indicator"
            class="flex flex-wrap items-end gap-3"
        {
            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }
                input
                    id="year"
                    name="year"
                    type="number"
                    min=(MIN_YEAR)
                    max=(MAX_YEAR)
                    value=(default_year)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="table-name" class=(FORM_LABEL_STYLE) { "Name (optional)" }
                input
                    id="table-name"
                    name="name"
                    type="text"
                    placeholder="Household"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="new-table-indicator"
                    {
                        (loading_spinner())
                    }
                    "Create table"
                }
            }
        }
    }
}

/// Handle table creation form submission.
///
/// The new table becomes the user's selected table and the client is
/// redirected to its monthly page.
pub async fn create_table_endpoint(
    State(state): State<BudgetTableState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NewTableForm>,
) -> Response {
    let year = match validate_year(form.year) {
        Ok(year) => year,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = create_budget_table(user_id, year, form.name.as_deref(), &connection)
        .and_then(|table| {
            set_selected_table_id(user_id, Some(table.id), &connection)?;
            Ok(table)
        });

    match result {
        Ok(table) => (
            HxRedirect(endpoints::monthly_view_for(table.id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("could not create table for {year}: {error}");
            error.into_alert_response()
        }
    }
}
