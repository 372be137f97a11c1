//! The yearly budget table that holds a user's categories and entries.

use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryKind, ExpenseSubtype, IncomeSubtype},
    database_id::DatabaseId,
};

/// The ID of a budget table.
pub type BudgetTableId = DatabaseId;

/// The earliest year a table can be created for.
pub const MIN_YEAR: i64 = 1900;
/// The latest year a table can be created for.
pub const MAX_YEAR: i64 = 9999;

/// The categories every new table starts with, in display order.
pub const DEFAULT_CATEGORIES: [(&str, CategoryKind); 6] = [
    ("Salary", CategoryKind::Income(IncomeSubtype::Receipt)),
    ("Rent", CategoryKind::Expense(ExpenseSubtype::Fixed)),
    ("Internet", CategoryKind::Expense(ExpenseSubtype::Fixed)),
    ("Electricity", CategoryKind::Expense(ExpenseSubtype::Fixed)),
    ("Gas", CategoryKind::Expense(ExpenseSubtype::Variable)),
    ("Groceries", CategoryKind::Expense(ExpenseSubtype::Variable)),
];

/// Check that `year` is a year a table can be created for.
///
/// # Errors
///
/// Returns [Error::InvalidYear] if `year` is outside [MIN_YEAR]..=[MAX_YEAR].
pub fn validate_year(year: i64) -> Result<i32, Error> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::InvalidYear(year));
    }

    i32::try_from(year).map_err(|_| Error::InvalidYear(year))
}

/// A user's budget for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTable {
    /// The ID of the table.
    pub id: BudgetTableId,
    /// The user that owns the table.
    pub user_id: UserID,
    /// The calendar year, unique per user.
    pub year: i32,
    /// An optional display name.
    pub name: Option<String>,
}

impl BudgetTable {
    /// The name shown in the table selector and page headings.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} ({})", self.year),
            None => format!("Budget {}", self.year),
        }
    }
}
