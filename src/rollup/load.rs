use std::collections::HashMap;

use rusqlite::Connection;

use crate::{
    Error,
    budget_table::BudgetTableId,
    category::{Category, CategoryId, get_categories_by_table},
    entry::{Entry, get_entries_by_table},
};

/// A category together with every entry recorded against it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithEntries {
    /// The category the entries belong to.
    pub category: Category,
    /// Every entry of the category, oldest first.
    pub entries: Vec<Entry>,
}

/// Load the categories of a table in creation order, each with its entries.
///
/// # Errors
///
/// Returns an [Error::SqlError] if a query fails.
pub fn load_categories_with_entries(
    table_id: BudgetTableId,
    connection: &Connection,
) -> Result<Vec<CategoryWithEntries>, Error> {
    let categories = get_categories_by_table(table_id, connection)?;
    let mut entries_by_category: HashMap<CategoryId, Vec<Entry>> = HashMap::new();

    for entry in get_entries_by_table(table_id, connection)? {
        entries_by_category
            .entry(entry.category_id)
            .or_default()
            .push(entry);
    }

    Ok(categories
        .into_iter()
        .map(|category| CategoryWithEntries {
            entries: entries_by_category.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect())
}
