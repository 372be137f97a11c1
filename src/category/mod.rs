//! Income and expense categories of a budget table.

mod create;
mod db;
mod delete;
mod domain;
mod edit;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_categories_by_table,
    get_category, rename_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryId, CategoryKind, CategoryName, CategoryType, ExpenseSubtype, IncomeSubtype,
};
pub use edit::rename_category_endpoint;
