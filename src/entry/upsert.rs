//! Entry write endpoint used by the month cells and the "add to month" form.

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
    category::CategoryId,
    endpoints,
    entry::{UpsertMode, parse_month, upsert_entry},
    money::parse_amount,
};

#[derive(Debug, Clone)]
pub struct EntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for writing an entry.
///
/// `month` and `amount` are kept as strings so that bad input can be reported
/// with the offending value.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertEntryForm {
    pub table_id: BudgetTableId,
    pub category_id: CategoryId,
    pub month: String,
    pub amount: String,
    pub mode: Option<String>,
}

/// Write an amount for a category and month, then reload the monthly page.
pub async fn upsert_entry_endpoint(
    State(state): State<EntryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<UpsertEntryForm>,
) -> Response {
    let parsed = parse_month(&form.month).and_then(|month| {
        let amount = parse_amount(&form.amount)?;
        let mode = UpsertMode::parse(form.mode.as_deref())?;
        Ok((month, amount, mode))
    });
    let (month, amount, mode) = match parsed {
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

    let result = get_owned_budget_table(form.table_id, user_id, &connection).and_then(|table| {
        upsert_entry(&table, form.category_id, month, amount, mode, &connection)
    });

    match result {
        Ok(entry) => {
            tracing::debug!(
                "wrote entry {} for category {} on {}: {}",
                entry.id,
                entry.category_id,
                entry.date,
                entry.amount
            );
            (
                HxRedirect(endpoints::monthly_view_for(entry.table_id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!(
                "could not write entry for category {} in table {}: {error}",
                form.category_id,
                form.table_id
            );
            error.into_alert_response()
        }
    }
}
