//! Yearly budget tables, their storage, endpoints and the active table selection.

mod create;
mod db;
mod delete;
mod domain;
mod selection;

pub use create::{create_table_endpoint, new_table_form};
pub use db::{
    create_budget_table, create_budget_table_table, delete_budget_table, get_budget_table,
    get_budget_tables_for_user, get_owned_budget_table,
};
pub use delete::delete_table_endpoint;
pub use domain::{BudgetTable, BudgetTableId, MAX_YEAR, MIN_YEAR, validate_year};
pub use selection::{
    TableQuery, get_selected_table_endpoint, resolve_active_table, select_table_endpoint,
    table_selector,
};
