//! Monthly entries recorded against categories.

mod db;
mod domain;
mod upsert;

pub use db::{create_entry_table, get_entries_by_table, upsert_entry};
pub use domain::{Entry, EntryId, UpsertMode, parse_month};
pub use upsert::upsert_entry_endpoint;
