//! Category delete endpoint.

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
    budget_table::get_owned_budget_table,
    category::{CategoryId, create::CategoryState, delete_category, get_category},
    endpoints,
};

/// Delete a category the user owns together with its entries.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_category(category_id, &connection).and_then(|category| {
        get_owned_budget_table(category.table_id, user_id, &connection)?;
        delete_category(category_id, &connection)?;
        Ok(category.table_id)
    });

    match result {
        Ok(table_id) => (
            HxRedirect(endpoints::monthly_view_for(table_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
