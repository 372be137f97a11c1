//! Category rename endpoint.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    budget_table::get_owned_budget_table,
    category::{CategoryId, CategoryName, create::CategoryState, get_category, rename_category},
    endpoints,
};

/// Form data for renaming a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameCategoryForm {
    pub name: String,
}

/// Rename a category the user owns.
///
/// The name must stay unique among categories of the same type in the table.
pub async fn rename_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<RenameCategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_category(category_id, &connection)
        .and_then(|category| get_owned_budget_table(category.table_id, user_id, &connection))
        .and_then(|_| rename_category(category_id, name, &connection));

    match result {
        Ok(category) => (
            HxRedirect(endpoints::monthly_view_for(category.table_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("could not rename category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
