//! The monthly page: one table's categories laid out month by month.
//!
//! Every month cell is an inline form, so amounts can be edited in place.

mod forms;
mod grid;
mod handlers;

pub use handlers::get_monthly_page;
