//! Resolves which table a user is looking at and remembers the choice.

use axum::{
    Extension, Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{UserID, get_selected_table_id, set_selected_table_id},
    budget_table::{
        BudgetTable, BudgetTableId, create::BudgetTableState, get_budget_tables_for_user,
        get_owned_budget_table,
    },
    endpoints,
    html::FORM_TEXT_INPUT_STYLE,
};

/// The `?table=<id>` query accepted by the monthly page and the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub table: Option<BudgetTableId>,
}

/// Pick the table to display for `user_id`.
///
/// In order of precedence:
/// 1. `explicit_table_id`, if the user owns it. The choice is saved.
/// 2. The user's saved selection, if they still own it.
/// 3. The user's table with the most recent year. The choice is saved.
///
/// Returns `None` if the user has no tables. An explicit ID for a table the
/// user does not own is ignored.
///
/// # Errors
///
/// Returns an [Error::SqlError] if reading or saving the selection fails.
pub fn resolve_active_table(
    user_id: UserID,
    explicit_table_id: Option<BudgetTableId>,
    connection: &Connection,
) -> Result<Option<BudgetTable>, Error> {
    let mut tables = get_budget_tables_for_user(user_id, connection)?;
    let mut take_table = |id: BudgetTableId| {
        tables
            .iter()
            .position(|table| table.id == id)
            .map(|index| tables.swap_remove(index))
    };

    if let Some(id) = explicit_table_id {
        match take_table(id) {
            Some(table) => {
                set_selected_table_id(user_id, Some(table.id), connection)?;
                return Ok(Some(table));
            }
            None => tracing::warn!("ignoring table {id} requested by user {user_id}"),
        }
    }

    if let Some(table) = get_selected_table_id(user_id, connection)?.and_then(&mut take_table) {
        return Ok(Some(table));
    }

    // `swap_remove` may have reordered the list, so look for the latest year again.
    let latest = tables.into_iter().max_by_key(|table| table.year);

    match latest {
        Some(table) => {
            set_selected_table_id(user_id, Some(table.id), connection)?;
            Ok(Some(table))
        }
        None => Ok(None),
    }
}

/// A drop-down that switches the selected table and reloads `view`.
pub fn table_selector(tables: &[BudgetTable], active: &BudgetTable, view: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::SELECTED_TABLE)
            hx-trigger="change"
            hx-target-error="#alert-container"
            class="min-w-48"
        {
            input type="hidden" name="view" value=(view);

            label for="table-select" class="sr-only" { "Table" }
            select id="table-select" name="table_id" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for table in tables {
                    option value=(table.id) selected[table.id == active.id]
                    {
                        (table.display_name())
                    }
                }
            }
        }
    }
}

/// Form data for changing the selected table.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectTableForm {
    pub table_id: BudgetTableId,
    /// The page to reload afterwards.
    pub view: Option<String>,
}

/// Save the user's selected table and reload the page it was changed on.
pub async fn select_table_endpoint(
    State(state): State<BudgetTableState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<SelectTableForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_owned_budget_table(form.table_id, user_id, &connection)
        .and_then(|table| set_selected_table_id(user_id, Some(table.id), &connection));

    if let Err(error) = result {
        tracing::warn!("could not select table {}: {error}", form.table_id);
        return error.into_alert_response();
    }

    let view = match form.view.as_deref() {
        Some(endpoints::MONTHLY_VIEW) => endpoints::MONTHLY_VIEW,
        _ => endpoints::DASHBOARD_VIEW,
    };

    (HxRedirect(view.to_owned()), StatusCode::SEE_OTHER).into_response()
}

/// The user's saved table selection.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTable {
    pub table_id: Option<BudgetTableId>,
}

/// Get the user's saved table selection as JSON.
pub async fn get_selected_table_endpoint(
    State(state): State<BudgetTableState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match get_selected_table_id(user_id, &connection) {
        Ok(table_id) => Json(SelectedTable { table_id }).into_response(),
        Err(error) => error.into_json_response(),
    }
}
