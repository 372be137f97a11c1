//! Database operations for categories.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    budget_table::BudgetTableId,
    category::{Category, CategoryId, CategoryKind, CategoryName, CategoryType},
};

/// Create a category in the table `table_id`.
///
/// # Errors
///
/// Returns [Error::DuplicateCategory] if the table already has a category with
/// the same name and type, or [Error::SqlError] for other SQL errors.
pub fn create_category(
    table_id: BudgetTableId,
    name: CategoryName,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (table_id, name, type, subtype) VALUES (?1, ?2, ?3, ?4);",
            (
                table_id,
                name.as_ref(),
                kind.category_type().as_str(),
                kind.subtype_str(),
            ),
        )
        .map_err(|error| map_unique_violation(error, &name, kind.category_type()))?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        table_id,
        name,
        kind,
    })
}

/// Retrieve a single category by ID.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no category with the ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, table_id, name, type, subtype FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Retrieve the categories of a table in the order they were created.
pub fn get_categories_by_table(
    table_id: BudgetTableId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, table_id, name, type, subtype FROM category
            WHERE table_id = :table_id
            ORDER BY id ASC;",
        )?
        .query_map(&[(":table_id", &table_id)], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Change the name of a category and return the updated category.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist, or
/// [Error::DuplicateCategory] if another category in the same table already
/// has the name and type.
pub fn rename_category(
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = get_category(category_id, connection)?;

    connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            (new_name.as_ref(), category_id),
        )
        .map_err(|error| map_unique_violation(error, &new_name, category.category_type()))?;

    Ok(Category {
        name: new_name,
        ..category
    })
}

/// Delete a category and all of its entries in one transaction.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist. Nothing
/// is deleted when an error is returned.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute("DELETE FROM entry WHERE category_id = ?1", [category_id])?;
    let rows_affected = transaction.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            table_id INTEGER NOT NULL REFERENCES budget_table(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            subtype TEXT NOT NULL,
            UNIQUE(table_id, name, type)
        );

        CREATE INDEX IF NOT EXISTS idx_category_table_id ON category(table_id);",
    )?;

    Ok(())
}

fn map_unique_violation(
    error: rusqlite::Error,
    name: &CategoryName,
    category_type: CategoryType,
) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
            Error::DuplicateCategory {
                name: name.to_string(),
                category_type,
            }
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let table_id = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let raw_type: String = row.get(3)?;
    let raw_subtype: String = row.get(4)?;

    let kind = raw_type
        .parse::<CategoryType>()
        .and_then(|category_type| CategoryKind::parse(category_type, Some(&raw_subtype)))
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;

    Ok(Category {
        id,
        table_id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::{Month, macros::date};

    use crate::{
        Error,
        budget_table::{BudgetTable, create_budget_table},
        category::{
            CategoryKind, CategoryName, CategoryType, ExpenseSubtype, IncomeSubtype,
            create_category, get_categories_by_table, get_category,
        },
        entry::{UpsertMode, get_entries_by_table, upsert_entry},
        test_utils::{get_test_db_connection, insert_test_user},
    };

    use super::{delete_category, rename_category};

    fn get_test_table() -> (Connection, BudgetTable) {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let table = create_budget_table(user.id, 2025, None, &connection)
            .expect("Could not create test table");

        (connection, table)
    }

    #[test]
    fn create_category_succeeds() {
        let (connection, table) = get_test_table();
        let name = CategoryName::new_unchecked("Shares");
        let kind = CategoryKind::Expense(ExpenseSubtype::Investment);

        let category = create_category(table.id, name.clone(), kind, &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(get_category(category.id, &connection), Ok(category));
    }

    #[test]
    fn create_category_fails_on_duplicate_name_and_type() {
        let (connection, table) = get_test_table();
        let before = get_categories_by_table(table.id, &connection).unwrap();

        let result = create_category(
            table.id,
            CategoryName::new_unchecked("Rent"),
            CategoryKind::Expense(ExpenseSubtype::Extra),
            &connection,
        );

        assert_eq!(
            result,
            Err(Error::DuplicateCategory {
                name: "Rent".to_owned(),
                category_type: CategoryType::Expense
            })
        );
        assert_eq!(get_categories_by_table(table.id, &connection).unwrap(), before);
    }

    #[test]
    fn same_name_is_allowed_for_other_type() {
        let (connection, table) = get_test_table();

        let result = create_category(
            table.id,
            CategoryName::new_unchecked("Rent"),
            CategoryKind::Income(IncomeSubtype::Receipt),
            &connection,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn categories_are_listed_in_creation_order() {
        let (connection, table) = get_test_table();

        let names: Vec<String> = get_categories_by_table(table.id, &connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(
            names,
            ["Salary", "Rent", "Internet", "Electricity", "Gas", "Groceries"]
        );
    }

    #[test]
    fn get_category_fails_on_missing_id() {
        let connection = get_test_db_connection();

        assert_eq!(get_category(42, &connection), Err(Error::CategoryNotFound));
    }

    #[test]
    fn rename_category_succeeds() {
        let (connection, table) = get_test_table();
        let gas = find_category(&connection, table.id, "Gas");

        let renamed = rename_category(gas.id, CategoryName::new_unchecked("Fuel"), &connection)
            .expect("Could not rename category");

        assert_eq!(renamed.name, CategoryName::new_unchecked("Fuel"));
        assert_eq!(get_category(gas.id, &connection), Ok(renamed));
    }

    #[test]
    fn rename_category_to_own_name_succeeds() {
        let (connection, table) = get_test_table();
        let gas = find_category(&connection, table.id, "Gas");

        let renamed = rename_category(gas.id, CategoryName::new_unchecked("Gas"), &connection);

        assert_eq!(renamed, Ok(gas));
    }

    #[test]
    fn rename_category_fails_on_collision() {
        let (connection, table) = get_test_table();
        let gas = find_category(&connection, table.id, "Gas");

        let result = rename_category(gas.id, CategoryName::new_unchecked("Rent"), &connection);

        assert_eq!(
            result,
            Err(Error::DuplicateCategory {
                name: "Rent".to_owned(),
                category_type: CategoryType::Expense
            })
        );
        assert_eq!(get_category(gas.id, &connection), Ok(gas));
    }

    #[test]
    fn rename_category_fails_on_missing_id() {
        let connection = get_test_db_connection();

        let result = rename_category(42, CategoryName::new_unchecked("Fuel"), &connection);

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn delete_category_deletes_its_entries() {
        let (connection, table) = get_test_table();
        let rent = find_category(&connection, table.id, "Rent");
        let salary = find_category(&connection, table.id, "Salary");
        upsert_entry(
            &table,
            rent.id,
            Month::March,
            Decimal::from(1200),
            UpsertMode::Accumulate,
            &connection,
        )
        .unwrap();
        upsert_entry(
            &table,
            salary.id,
            Month::March,
            Decimal::from(5000),
            UpsertMode::Accumulate,
            &connection,
        )
        .unwrap();

        delete_category(rent.id, &connection).expect("Could not delete category");

        assert_eq!(get_category(rent.id, &connection), Err(Error::CategoryNotFound));
        let entries = get_entries_by_table(table.id, &connection).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category_id, salary.id);
        assert_eq!(entries[0].date, date!(2025 - 03 - 15));
    }

    #[test]
    fn delete_category_fails_on_missing_id() {
        let connection = get_test_db_connection();

        assert_eq!(delete_category(42, &connection), Err(Error::CategoryNotFound));
    }

    fn find_category(
        connection: &Connection,
        table_id: i64,
        name: &str,
    ) -> crate::category::Category {
        get_categories_by_table(table_id, connection)
            .unwrap()
            .into_iter()
            .find(|category| category.name.as_ref() == name)
            .expect("Could not find default category")
    }
}
