//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::UserID,
    budget_table::{BudgetTableId, get_owned_budget_table},
    category::{CategoryKind, CategoryName, CategoryType, create_category},
    endpoints,
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewCategoryForm {
    pub table_id: BudgetTableId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    /// Empty or missing selects the default subtype for the type.
    pub subtype: Option<String>,
}

impl NewCategoryForm {
    fn parse(&self) -> Result<(CategoryName, CategoryKind), Error> {
        let name = CategoryName::new(&self.name)?;
        let category_type: CategoryType = self.category_type.parse()?;
        let kind = CategoryKind::parse(category_type, self.subtype.as_deref())?;

        Ok((name, kind))
    }
}

/// Handle category creation form submission.
///
/// On success the client is redirected to the monthly page of the table.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NewCategoryForm>,
) -> Response {
    let (name, kind) = match form.parse() {
        Ok(parsed) => parsed,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_owned_budget_table(form.table_id, user_id, &connection)
        .and_then(|table| create_category(table.id, name, kind, &connection));

    match result {
        Ok(category) => (
            HxRedirect(endpoints::monthly_view_for(category.table_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("could not create category in table {}: {error}", form.table_id);
            error.into_alert_response()
        }
    }
}
