//! Dashboard module
//!
//! Provides a yearly overview of the active table: income, expense and
//! balance cards, an expense breakdown by category and monthly totals.

mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
