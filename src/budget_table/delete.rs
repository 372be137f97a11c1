//! Budget table delete endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    auth::UserID,
    budget_table::{BudgetTableId, create::BudgetTableState, delete_budget_table, get_owned_budget_table},
    endpoints,
};

/// Delete a table the user owns along with all of its categories and entries.
pub async fn delete_table_endpoint(
    State(state): State<BudgetTableState>,
    Extension(user_id): Extension<UserID>,
    Path(table_id): Path<BudgetTableId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_owned_budget_table(table_id, user_id, &connection)
        .and_then(|table| delete_budget_table(table.id, &connection));

    match result {
        Ok(()) => (
            HxRedirect(endpoints::MONTHLY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("could not delete table {table_id}: {error}");
            error.into_alert_response()
        }
    }
}
