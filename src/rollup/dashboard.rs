//! The yearly summary shown on the dashboard.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{budget_table::BudgetTable, category::CategoryType, rollup::CategoryWithEntries};

/// The yearly total of one expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// The category name.
    pub name: String,
    /// The yearly total of the category.
    pub value: Decimal,
}

/// Yearly totals of a table, without month granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRollup {
    /// The sum of every income entry.
    pub total_income: Decimal,
    /// The sum of every expense entry.
    pub total_expense: Decimal,
    /// Total income minus total expense.
    pub balance: Decimal,
    /// Expense categories, largest first.
    pub category_expenses: Vec<CategoryExpense>,
    /// The year of the table.
    pub year: i32,
    /// The table's name, if it has one.
    pub table_name: Option<String>,
}

/// Sum every entry of `table` into yearly income and expense totals.
///
/// Expense categories are listed by their total in descending order. Ties
/// keep the order the categories were given in.
pub fn dashboard_rollup(table: &BudgetTable, categories: &[CategoryWithEntries]) -> DashboardRollup {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut category_expenses = Vec::new();

    for category_with_entries in categories {
        let category_total: Decimal = category_with_entries
            .entries
            .iter()
            .map(|entry| entry.amount)
            .sum();

        match category_with_entries.category.category_type() {
            CategoryType::Income => total_income += category_total,
            CategoryType::Expense => {
                total_expense += category_total;
                category_expenses.push(CategoryExpense {
                    name: category_with_entries.category.name.to_string(),
                    value: category_total,
                });
            }
        }
    }

    // `sort_by` is stable, so equal values keep their relative order.
    category_expenses.sort_by(|a, b| b.value.cmp(&a.value));

    DashboardRollup {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_expenses,
        year: table.year,
        table_name: table.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::Month;

    use crate::{
        UserID,
        budget_table::BudgetTable,
        category::{CategoryKind, ExpenseSubtype, IncomeSubtype},
        rollup::test_data::{TABLE_ID, category},
    };

    use super::dashboard_rollup;

    fn table() -> BudgetTable {
        BudgetTable {
            id: TABLE_ID,
            user_id: UserID::new(1),
            year: 2025,
            name: Some("Household".to_owned()),
        }
    }

    fn expense(id: i64, name: &str, amount: i64) -> crate::rollup::CategoryWithEntries {
        category(id, name, CategoryKind::Expense(ExpenseSubtype::Variable))
            .with_entry(Month::May, Decimal::from(amount))
    }

    #[test]
    fn empty_table_has_zero_totals() {
        let rollup = dashboard_rollup(&table(), &[]);

        assert_eq!(rollup.total_income, Decimal::ZERO);
        assert_eq!(rollup.total_expense, Decimal::ZERO);
        assert_eq!(rollup.balance, Decimal::ZERO);
        assert!(rollup.category_expenses.is_empty());
        assert_eq!(rollup.year, 2025);
        assert_eq!(rollup.table_name.as_deref(), Some("Household"));
    }

    #[test]
    fn salary_every_month_totals_sixty_thousand() {
        let mut salary = category(1, "Salary", CategoryKind::Income(IncomeSubtype::Receipt));
        for month in [
            Month::January,
            Month::February,
            Month::March,
            Month::April,
            Month::May,
            Month::June,
            Month::July,
            Month::August,
            Month::September,
            Month::October,
            Month::November,
            Month::December,
        ] {
            salary = salary.with_entry(month, Decimal::from(5000));
        }

        let rollup = dashboard_rollup(&table(), &[salary]);

        assert_eq!(rollup.total_income, Decimal::from(60_000));
        assert_eq!(rollup.balance, Decimal::from(60_000));
        assert!(rollup.category_expenses.is_empty());
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let categories = [
            category(1, "Salary", CategoryKind::Income(IncomeSubtype::Receipt))
                .with_entry(Month::January, Decimal::from(3000))
                .with_entry(Month::February, Decimal::from(3000)),
            category(2, "Rent", CategoryKind::Expense(ExpenseSubtype::Fixed))
                .with_entry(Month::January, Decimal::from(1200)),
            expense(3, "Groceries", 450),
        ];

        let rollup = dashboard_rollup(&table(), &categories);

        assert_eq!(rollup.total_income, Decimal::from(6000));
        assert_eq!(rollup.total_expense, Decimal::from(1650));
        assert_eq!(rollup.balance, Decimal::from(4350));
    }

    #[test]
    fn category_expenses_sort_descending_with_stable_ties() {
        let categories = [expense(1, "A", 300), expense(2, "B", 500), expense(3, "C", 500)];

        let rollup = dashboard_rollup(&table(), &categories);

        let names: Vec<_> = rollup
            .category_expenses
            .iter()
            .map(|expense| expense.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn income_categories_are_not_listed_as_expenses() {
        let categories = [
            category(1, "Dividends", CategoryKind::Income(IncomeSubtype::Investment))
                .with_entry(Month::June, Decimal::from(80)),
            expense(2, "Gas", 60),
        ];

        let rollup = dashboard_rollup(&table(), &categories);

        assert_eq!(rollup.category_expenses.len(), 1);
        assert_eq!(rollup.category_expenses[0].name, "Gas");
        assert_eq!(rollup.category_expenses[0].value, Decimal::from(60));
    }

    #[test]
    fn expense_without_entries_is_listed_with_zero() {
        let categories = [category(1, "Internet", CategoryKind::Expense(ExpenseSubtype::Fixed))];

        let rollup = dashboard_rollup(&table(), &categories);

        assert_eq!(rollup.category_expenses[0].value, Decimal::ZERO);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let rollup = dashboard_rollup(&table(), &[expense(1, "Gas", 60)]);

        let json = serde_json::to_value(&rollup).unwrap();

        assert_eq!(json["totalIncome"], "0");
        assert_eq!(json["totalExpense"], "60");
        assert_eq!(json["balance"], "-60");
        assert_eq!(json["categoryExpenses"][0]["name"], "Gas");
        assert_eq!(json["categoryExpenses"][0]["value"], "60");
        assert_eq!(json["year"], 2025);
        assert_eq!(json["tableName"], "Household");
    }
}
