//! The month by month rollup shown in the monthly grid.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    category::{CategoryId, CategoryKind, CategoryType, ExpenseSubtype, IncomeSubtype},
    rollup::CategoryWithEntries,
};

/// One amount per month, January first.
pub type MonthlyTotals = [Decimal; 12];

/// The month names used as column labels.
pub const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const ZERO_TOTALS: MonthlyTotals = [Decimal::ZERO; 12];

/// The monthly totals of a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRollup {
    /// The ID of the category.
    pub id: CategoryId,
    /// The category name.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// The lowercase subtype name.
    pub subtype: &'static str,
    /// The sum of the category's entries for each month.
    pub monthly_totals: MonthlyTotals,
    /// The sum of `monthly_totals`.
    pub total: Decimal,
}

/// A group of categories and their combined monthly totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    /// The categories in storage order.
    pub categories: Vec<CategoryRollup>,
    /// The sum over the categories for each month.
    pub totals: MonthlyTotals,
}

impl Default for CategoryGroup {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            totals: ZERO_TOTALS,
        }
    }
}

impl CategoryGroup {
    fn push(&mut self, rollup: CategoryRollup) {
        add_assign(&mut self.totals, &rollup.monthly_totals);
        self.categories.push(rollup);
    }
}

/// Every income category in one flat group, plus the same categories split
/// by subtype.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncomeRollup {
    /// Every income category.
    pub categories: Vec<CategoryRollup>,
    /// Monthly income.
    pub totals: MonthlyTotals,
    /// Income categories with the receipt subtype.
    pub receipt: CategoryGroup,
    /// Income categories with the investment subtype.
    pub investment: CategoryGroup,
}

/// Expense categories grouped by subtype.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseRollup {
    /// Fixed expenses such as rent.
    pub fixed: CategoryGroup,
    /// Variable expenses such as groceries.
    pub variable: CategoryGroup,
    /// One-off expenses.
    pub extra: CategoryGroup,
    /// Money put into investments.
    pub investment: CategoryGroup,
    /// The sum of the four subtype totals.
    pub totals: MonthlyTotals,
}

/// The expense subtype totals, for charts that show expenses as negatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseBreakdown {
    /// Monthly fixed expenses.
    pub fixed: MonthlyTotals,
    /// Monthly variable expenses.
    pub variable: MonthlyTotals,
    /// Monthly extra expenses.
    pub extra: MonthlyTotals,
    /// Monthly investment expenses.
    pub investment: MonthlyTotals,
}

/// The full monthly rollup of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRollup {
    /// January to December.
    pub months: [&'static str; 12],
    /// Income categories and totals.
    pub income: IncomeRollup,
    /// Expense categories grouped by subtype.
    pub expense: ExpenseRollup,
    /// Income minus expenses for each month.
    pub balance: MonthlyTotals,
    /// The monthly totals of each expense subtype.
    pub expense_breakdown: ExpenseBreakdown,
}

fn add_assign(totals: &mut MonthlyTotals, other: &MonthlyTotals) {
    for (total, amount) in totals.iter_mut().zip(other) {
        *total += *amount;
    }
}

fn rollup_category(category_with_entries: &CategoryWithEntries) -> CategoryRollup {
    let category = &category_with_entries.category;
    let mut monthly_totals = ZERO_TOTALS;

    // Entries are bucketed by calendar month only; the year is not checked.
    for entry in &category_with_entries.entries {
        let month_index = usize::from(u8::from(entry.date.month())) - 1;
        monthly_totals[month_index] += entry.amount;
    }

    CategoryRollup {
        id: category.id,
        name: category.name.to_string(),
        category_type: category.category_type(),
        subtype: category.kind.subtype_str(),
        total: monthly_totals.iter().sum(),
        monthly_totals,
    }
}

/// Roll the entries of `categories` up into monthly totals.
///
/// Categories keep the order they are given in within each group.
pub fn monthly_rollup(categories: &[CategoryWithEntries]) -> MonthlyRollup {
    let mut income = IncomeRollup::default();
    let mut expense = ExpenseRollup::default();

    for category_with_entries in categories {
        let rollup = rollup_category(category_with_entries);

        match category_with_entries.category.kind {
            CategoryKind::Income(subtype) => {
                add_assign(&mut income.totals, &rollup.monthly_totals);
                income.categories.push(rollup.clone());

                match subtype {
                    IncomeSubtype::Receipt => income.receipt.push(rollup),
                    IncomeSubtype::Investment => income.investment.push(rollup),
                }
            }
            CategoryKind::Expense(subtype) => match subtype {
                ExpenseSubtype::Fixed => expense.fixed.push(rollup),
                ExpenseSubtype::Variable => expense.variable.push(rollup),
                ExpenseSubtype::Extra => expense.extra.push(rollup),
                ExpenseSubtype::Investment => expense.investment.push(rollup),
            },
        }
    }

    for group in [
        &expense.fixed,
        &expense.variable,
        &expense.extra,
        &expense.investment,
    ] {
        add_assign(&mut expense.totals, &group.totals);
    }

    let mut balance = income.totals;
    for (month_balance, month_expense) in balance.iter_mut().zip(&expense.totals) {
        *month_balance -= *month_expense;
    }

    let expense_breakdown = ExpenseBreakdown {
        fixed: expense.fixed.totals,
        variable: expense.variable.totals,
        extra: expense.extra.totals,
        investment: expense.investment.totals,
    };

    MonthlyRollup {
        months: MONTH_LABELS,
        income,
        expense,
        balance,
        expense_breakdown,
    }
}
