//! Rolls the entries of a table up into monthly and yearly totals.
//!
//! The rollups are pure functions of a table's categories and entries, so
//! they never fail and produce the same output for the same input.

mod api;
mod dashboard;
mod load;
mod monthly;

pub use api::{get_dashboard_rollup_endpoint, get_monthly_rollup_endpoint};
pub use dashboard::{CategoryExpense, DashboardRollup, dashboard_rollup};
pub use load::{CategoryWithEntries, load_categories_with_entries};
pub use monthly::{
    CategoryGroup, CategoryRollup, ExpenseBreakdown, ExpenseRollup, IncomeRollup, MONTH_LABELS,
    MonthlyRollup, MonthlyTotals, monthly_rollup,
};

#[cfg(test)]
pub(crate) mod test_data {
    //! In-memory categories and entries for rollup tests.

    use rust_decimal::Decimal;
    use time::{Date, Month};

    use crate::{
        category::{Category, CategoryKind, CategoryName},
        entry::Entry,
    };

    use super::CategoryWithEntries;

    pub const TABLE_ID: i64 = 1;

    pub fn category(id: i64, name: &str, kind: CategoryKind) -> CategoryWithEntries {
        CategoryWithEntries {
            category: Category {
                id,
                table_id: TABLE_ID,
                name: CategoryName::new_unchecked(name),
                kind,
            },
            entries: Vec::new(),
        }
    }

    impl CategoryWithEntries {
        /// Add an entry dated on the 15th of `month` in 2025.
        pub fn with_entry(self, month: Month, amount: Decimal) -> Self {
            self.with_dated_entry(2025, month, amount)
        }

        pub fn with_dated_entry(mut self, year: i32, month: Month, amount: Decimal) -> Self {
            let id = self.entries.len() as i64 + 1;
            self.entries.push(Entry {
                id,
                table_id: TABLE_ID,
                category_id: self.category.id,
                date: Date::from_calendar_date(year, month, 15).unwrap(),
                amount,
                description: None,
            });
            self
        }
    }
}
