//! JSON endpoints for the rollups of a table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget_table::{BudgetTableId, get_owned_budget_table},
    rollup::{dashboard_rollup, load_categories_with_entries, monthly_rollup},
};

/// The state needed to compute the rollups of a table.
#[derive(Debug, Clone)]
pub struct RollupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RollupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return the monthly rollup of a table the user owns as JSON.
pub async fn get_monthly_rollup_endpoint(
    State(state): State<RollupState>,
    Extension(user_id): Extension<UserID>,
    Path(table_id): Path<BudgetTableId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    let result = get_owned_budget_table(table_id, user_id, &connection)
        .and_then(|table| load_categories_with_entries(table.id, &connection));

    match result {
        Ok(categories) => Json(monthly_rollup(&categories)).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// Return the yearly summary of a table the user owns as JSON.
pub async fn get_dashboard_rollup_endpoint(
    State(state): State<RollupState>,
    Extension(user_id): Extension<UserID>,
    Path(table_id): Path<BudgetTableId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    let result = get_owned_budget_table(table_id, user_id, &connection).and_then(|table| {
        load_categories_with_entries(table.id, &connection)
            .map(|categories| dashboard_rollup(&table, &categories))
    });

    match result {
        Ok(rollup) => Json(rollup).into_response(),
        Err(error) => error.into_json_response(),
    }
}
