//! Database set up.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, budget_table::create_budget_table_table,
    category::create_category_table, entry::create_entry_table,
};

/// Enable foreign keys and create every table the app needs.
///
/// The tables are created in a single exclusive transaction, so calling this
/// on an existing database is safe.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_budget_table_table(&transaction)?;
    create_category_table(&transaction)?;
    create_entry_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
