//! Core category domain types.
//!
//! A category is either income or expense, and always carries a subtype.
//! Missing subtypes are replaced by the default for the category type when
//! the category is created, so the rest of the app never sees an absent subtype.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, budget_table::BudgetTableId, database_id::DatabaseId};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// Whether money comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl CategoryType {
    /// The lowercase name used in forms and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            _ => Err(Error::InvalidCategoryType(s.to_owned())),
        }
    }
}

/// How an expense behaves from month to month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseSubtype {
    /// The same amount every month, e.g. rent.
    Fixed,
    /// Changes every month, e.g. groceries.
    #[default]
    Variable,
    /// One-off spending.
    Extra,
    /// Money put aside into investments.
    Investment,
}

impl ExpenseSubtype {
    /// Every expense subtype in display order.
    pub const ALL: [ExpenseSubtype; 4] = [
        ExpenseSubtype::Fixed,
        ExpenseSubtype::Variable,
        ExpenseSubtype::Extra,
        ExpenseSubtype::Investment,
    ];

    /// The lowercase name used in forms and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseSubtype::Fixed => "fixed",
            ExpenseSubtype::Variable => "variable",
            ExpenseSubtype::Extra => "extra",
            ExpenseSubtype::Investment => "investment",
        }
    }

    /// The capitalized name shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseSubtype::Fixed => "Fixed",
            ExpenseSubtype::Variable => "Variable",
            ExpenseSubtype::Extra => "Extra",
            ExpenseSubtype::Investment => "Investment",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|subtype| subtype.as_str().eq_ignore_ascii_case(raw))
    }
}

/// Where income comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSubtype {
    /// Wages and other regular receipts.
    #[default]
    Receipt,
    /// Returns from investments.
    Investment,
}

impl IncomeSubtype {
    /// Every income subtype in display order.
    pub const ALL: [IncomeSubtype; 2] = [IncomeSubtype::Receipt, IncomeSubtype::Investment];

    /// The lowercase name used in forms and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeSubtype::Receipt => "receipt",
            IncomeSubtype::Investment => "investment",
        }
    }

    /// The capitalized name shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            IncomeSubtype::Receipt => "Receipt",
            IncomeSubtype::Investment => "Investment",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|subtype| subtype.as_str().eq_ignore_ascii_case(raw))
    }
}

/// The type of a category together with its subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// An income category.
    Income(IncomeSubtype),
    /// An expense category.
    Expense(ExpenseSubtype),
}

impl CategoryKind {
    /// Combine a category type and an optional raw subtype.
    ///
    /// An empty or missing subtype selects the default subtype for the type.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidSubtype] if `subtype` is not valid for `category_type`.
    pub fn parse(category_type: CategoryType, subtype: Option<&str>) -> Result<Self, Error> {
        let subtype = subtype.map(str::trim).filter(|subtype| !subtype.is_empty());

        let invalid = |raw: &str| Error::InvalidSubtype {
            category_type,
            subtype: raw.to_owned(),
        };

        match (category_type, subtype) {
            (CategoryType::Income, None) => Ok(CategoryKind::Income(IncomeSubtype::default())),
            (CategoryType::Income, Some(raw)) => IncomeSubtype::parse(raw)
                .map(CategoryKind::Income)
                .ok_or_else(|| invalid(raw)),
            (CategoryType::Expense, None) => Ok(CategoryKind::Expense(ExpenseSubtype::default())),
            (CategoryType::Expense, Some(raw)) => ExpenseSubtype::parse(raw)
                .map(CategoryKind::Expense)
                .ok_or_else(|| invalid(raw)),
        }
    }

    /// Whether the kind is income or expense.
    pub fn category_type(&self) -> CategoryType {
        match self {
            CategoryKind::Income(_) => CategoryType::Income,
            CategoryKind::Expense(_) => CategoryType::Expense,
        }
    }

    /// The lowercase subtype name.
    pub fn subtype_str(&self) -> &'static str {
        match self {
            CategoryKind::Income(subtype) => subtype.as_str(),
            CategoryKind::Expense(subtype) => subtype.as_str(),
        }
    }
}

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named income or expense bucket inside a budget table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The table the category belongs to.
    pub table_id: BudgetTableId,
    /// The display name, unique within the table for its type.
    pub name: CategoryName,
    /// The type and subtype of the category.
    pub kind: CategoryKind,
}

impl Category {
    /// Whether the category is income or expense.
    pub fn category_type(&self) -> CategoryType {
        self.kind.category_type()
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CategoryKind, CategoryName, CategoryType, ExpenseSubtype, IncomeSubtype};

    #[test]
    fn missing_expense_subtype_defaults_to_variable() {
        assert_eq!(
            CategoryKind::parse(CategoryType::Expense, None),
            Ok(CategoryKind::Expense(ExpenseSubtype::Variable))
        );
        assert_eq!(
            CategoryKind::parse(CategoryType::Expense, Some("  ")),
            Ok(CategoryKind::Expense(ExpenseSubtype::Variable))
        );
    }

    #[test]
    fn missing_income_subtype_defaults_to_receipt() {
        assert_eq!(
            CategoryKind::parse(CategoryType::Income, None),
            Ok(CategoryKind::Income(IncomeSubtype::Receipt))
        );
    }

    #[test]
    fn parses_subtypes_case_insensitively() {
        assert_eq!(
            CategoryKind::parse(CategoryType::Expense, Some("Fixed")),
            Ok(CategoryKind::Expense(ExpenseSubtype::Fixed))
        );
        assert_eq!(
            CategoryKind::parse(CategoryType::Income, Some("investment")),
            Ok(CategoryKind::Income(IncomeSubtype::Investment))
        );
    }

    #[test]
    fn rejects_subtype_of_other_type() {
        assert_eq!(
            CategoryKind::parse(CategoryType::Income, Some("fixed")),
            Err(Error::InvalidSubtype {
                category_type: CategoryType::Income,
                subtype: "fixed".to_owned()
            })
        );
    }

    #[test]
    fn parses_category_type() {
        assert_eq!("Income".parse(), Ok(CategoryType::Income));
        assert_eq!("expense".parse(), Ok(CategoryType::Expense));
        assert_eq!(
            "savings".parse::<CategoryType>(),
            Err(Error::InvalidCategoryType("savings".to_owned()))
        );
    }

    #[test]
    fn category_name_is_trimmed_and_non_empty() {
        assert_eq!(
            CategoryName::new("  Rent "),
            Ok(CategoryName::new_unchecked("Rent"))
        );
        assert_eq!(CategoryName::new("\n\t "), Err(Error::EmptyCategoryName));
    }
}
