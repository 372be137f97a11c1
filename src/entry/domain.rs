//! A dated amount recorded against a category.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error, budget_table::BudgetTableId, category::CategoryId, database_id::DatabaseId,
};

/// The ID of an entry.
pub type EntryId = DatabaseId;

/// The day of the month every entry is dated on.
/// The day of the month every entry is dated on.
pub const ENTRY_DAY: u8 = 15;

/// An amount recorded against a category for one month of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The ID of the entry.
    pub id: EntryId,
    /// The table the entry belongs to.
    pub table_id: BudgetTableId,
    /// The category the amount is recorded against.
    pub category_id: CategoryId,
    /// The 15th of the entry's month in the table's year.
    pub date: Date,
    /// The amount, rounded to cents.
    pub amount: Decimal,
    /// An optional note.
    pub description: Option<String>,
}

/// How an amount is combined with an existing entry for the same month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpsertMode {
    /// Add the amount to the existing entry.
    #[default]
    Accumulate,
    /// Overwrite the amount of the existing entry.
    Replace,
}

impl UpsertMode {
    /// Parse the mode sent by a form. A missing or empty value means
    /// [UpsertMode::Accumulate].
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUpsertMode] for any other unknown value.
    pub fn parse(raw_mode: Option<&str>) -> Result<Self, Error> {
        match raw_mode.map(str::trim) {
            None | Some("") | Some("accumulate") => Ok(Self::Accumulate),
            Some("replace") => Ok(Self::Replace),
            Some(other) => Err(Error::InvalidUpsertMode(other.to_owned())),
        }
    }
}

/// Parse a month number from 1 (January) to 12 (December).
///
/// # Errors
///
/// Returns [Error::InvalidMonth] if `raw_month` is not a number in that range.
pub fn parse_month(raw_month: &str) -> Result<Month, Error> {
    raw_month
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .ok_or_else(|| Error::InvalidMonth(raw_month.to_owned()))
}

/// The date entries for `month` of `year` are recorded on.
///
/// # Errors
///
/// Returns [Error::InvalidYear] if the date cannot be represented.
pub fn entry_date(year: i32, month: Month) -> Result<Date, Error> {
    Date::from_calendar_date(year, month, ENTRY_DAY).map_err(|_| Error::InvalidYear(year.into()))
}
