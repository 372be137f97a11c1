//! Storage for budget tables.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    budget_table::{BudgetTable, BudgetTableId, domain::DEFAULT_CATEGORIES, validate_year},
    category::{CategoryName, create_category},
};

/// Create a table for `year` owned by `user_id` and seed it with the default
/// categories.
///
/// The table and its categories are written in one transaction, so either all
/// of them are stored or none are. An empty or blank `name` is stored as no
/// name.
///
/// # Errors
///
/// Returns:
/// - [Error::InvalidYear] if `year` is out of range,
/// - [Error::DuplicateBudgetTable] if the user already has a table for `year`,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_budget_table(
    user_id: UserID,
    year: i32,
    name: Option<&str>,
    connection: &Connection,
) -> Result<BudgetTable, Error> {
    validate_year(year.into())?;
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned);

    let transaction = connection.unchecked_transaction()?;

    match transaction.execute(
        "INSERT INTO budget_table (user_id, year, name) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), year, &name),
    ) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(error, Some(_))) if error.extended_code == 2067 => {
            return Err(Error::DuplicateBudgetTable(year));
        }
        Err(error) => return Err(error.into()),
    }

    let id = transaction.last_insert_rowid();

    for (category_name, kind) in DEFAULT_CATEGORIES {
        create_category(id, CategoryName::new_unchecked(category_name), kind, &transaction)?;
    }

    transaction.commit()?;

    Ok(BudgetTable {
        id,
        user_id,
        year,
        name,
    })
}

/// Get the table with `id`.
///
/// # Errors
///
/// Returns [Error::BudgetTableNotFound] if there is no such table.
pub fn get_budget_table(id: BudgetTableId, connection: &Connection) -> Result<BudgetTable, Error> {
    connection
        .prepare("SELECT id, user_id, year, name FROM budget_table WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BudgetTableNotFound,
            error => error.into(),
        })
}

/// Get the table with `id` if it is owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::BudgetTableNotFound] if there is no such table and
/// [Error::Forbidden] if another user owns it.
pub fn get_owned_budget_table(
    id: BudgetTableId,
    user_id: UserID,
    connection: &Connection,
) -> Result<BudgetTable, Error> {
    let table = get_budget_table(id, connection)?;

    if table.user_id != user_id {
        tracing::warn!("user {user_id} tried to access table {id} owned by {}", table.user_id);
        return Err(Error::Forbidden);
    }

    Ok(table)
}

/// Get all tables owned by `user_id`, most recent year first.
pub fn get_budget_tables_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<BudgetTable>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, year, name FROM budget_table
            WHERE user_id = :user_id
            ORDER BY year DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_table| maybe_table.map_err(Error::from))
        .collect()
}

/// Delete the table with `id` along with its categories and entries.
///
/// Any user that had the table selected has their selection cleared. All
/// deletes happen in one transaction.
///
/// # Errors
///
/// Returns [Error::BudgetTableNotFound] if there is no such table.
pub fn delete_budget_table(id: BudgetTableId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute("DELETE FROM entry WHERE table_id = ?1", (id,))?;
    transaction.execute("DELETE FROM category WHERE table_id = ?1", (id,))?;
    transaction.execute(
        "UPDATE user SET selected_table_id = NULL WHERE selected_table_id = ?1",
        (id,),
    )?;
    let rows_affected = transaction.execute("DELETE FROM budget_table WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::BudgetTableNotFound);
    }

    transaction.commit()?;

    Ok(())
}

pub fn create_budget_table_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget_table (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            year INTEGER NOT NULL,
            name TEXT,
            UNIQUE(user_id, year)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_table_user_id ON budget_table(user_id);",
    )
}

fn map_row(row: &Row) -> Result<BudgetTable, rusqlite::Error> {
    Ok(BudgetTable {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        year: row.get(2)?,
        name: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::Month;

    use crate::{
        Error,
        auth::{get_selected_table_id, set_selected_table_id},
        budget_table::{
            create_budget_table, delete_budget_table, get_budget_table,
            get_budget_tables_for_user, get_owned_budget_table,
        },
        category::{CategoryKind, ExpenseSubtype, IncomeSubtype, get_categories_by_table},
        entry::{UpsertMode, get_entries_by_table, upsert_entry},
        test_utils::{get_test_db_connection, insert_test_user, insert_test_user_with_email},
    };

    #[test]
    fn create_table_seeds_default_categories() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);

        let table = create_budget_table(user.id, 2025, Some("  Household "), &connection).unwrap();

        assert_eq!(table.year, 2025);
        assert_eq!(table.name.as_deref(), Some("Household"));
        let categories = get_categories_by_table(table.id, &connection).unwrap();
        let got: Vec<(&str, CategoryKind)> = categories
            .iter()
            .map(|category| (category.name.as_ref(), category.kind))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Salary", CategoryKind::Income(IncomeSubtype::Receipt)),
                ("Rent", CategoryKind::Expense(ExpenseSubtype::Fixed)),
                ("Internet", CategoryKind::Expense(ExpenseSubtype::Fixed)),
                ("Electricity", CategoryKind::Expense(ExpenseSubtype::Fixed)),
                ("Gas", CategoryKind::Expense(ExpenseSubtype::Variable)),
                ("Groceries", CategoryKind::Expense(ExpenseSubtype::Variable)),
            ]
        );
    }

    #[test]
    fn blank_name_is_stored_as_none() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);

        let table = create_budget_table(user.id, 2025, Some("   "), &connection).unwrap();

        assert_eq!(get_budget_table(table.id, &connection).unwrap().name, None);
    }

    #[test]
    fn duplicate_year_is_a_conflict_and_keeps_one_table() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let first = create_budget_table(user.id, 2025, None, &connection).unwrap();

        let result = create_budget_table(user.id, 2025, Some("Again"), &connection);

        assert_eq!(result, Err(Error::DuplicateBudgetTable(2025)));
        let tables = get_budget_tables_for_user(user.id, &connection).unwrap();
        assert_eq!(tables, vec![first.clone()]);
        assert_eq!(get_categories_by_table(first.id, &connection).unwrap().len(), 6);
    }

    #[test]
    fn different_users_can_have_tables_for_the_same_year() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let other_user = insert_test_user_with_email("other@example.com", &connection);

        create_budget_table(user.id, 2025, None, &connection).unwrap();
        let result = create_budget_table(other_user.id, 2025, None, &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn create_table_rejects_invalid_year() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);

        let result = create_budget_table(user.id, 20_000, None, &connection);

        assert_eq!(result, Err(Error::InvalidYear(20_000)));
        assert!(get_budget_tables_for_user(user.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn tables_are_listed_most_recent_year_first() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let t2024 = create_budget_table(user.id, 2024, None, &connection).unwrap();
        let t2026 = create_budget_table(user.id, 2026, None, &connection).unwrap();
        let t2025 = create_budget_table(user.id, 2025, None, &connection).unwrap();

        let tables = get_budget_tables_for_user(user.id, &connection).unwrap();

        assert_eq!(tables, vec![t2026, t2025, t2024]);
    }

    #[test]
    fn get_missing_table_is_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_budget_table(42, &connection), Err(Error::BudgetTableNotFound));
    }

    #[test]
    fn get_owned_table_checks_owner() {
        let connection = get_test_db_connection();
        let owner = insert_test_user(&connection);
        let other_user = insert_test_user_with_email("other@example.com", &connection);
        let table = create_budget_table(owner.id, 2025, None, &connection).unwrap();

        assert_eq!(
            get_owned_budget_table(table.id, owner.id, &connection),
            Ok(table.clone())
        );
        assert_eq!(
            get_owned_budget_table(table.id, other_user.id, &connection),
            Err(Error::Forbidden)
        );
    }

    #[test]
    fn delete_table_removes_categories_entries_and_selection() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let table = create_budget_table(user.id, 2025, None, &connection).unwrap();
        let other_table = create_budget_table(user.id, 2024, None, &connection).unwrap();
        let salary = get_categories_by_table(table.id, &connection).unwrap()[0].clone();
        upsert_entry(
            &table,
            salary.id,
            Month::January,
            Decimal::from(5000),
            UpsertMode::Accumulate,
            &connection,
        )
        .unwrap();
        set_selected_table_id(user.id, Some(table.id), &connection).unwrap();

        delete_budget_table(table.id, &connection).unwrap();

        assert_eq!(get_budget_table(table.id, &connection), Err(Error::BudgetTableNotFound));
        assert!(get_categories_by_table(table.id, &connection).unwrap().is_empty());
        assert!(get_entries_by_table(table.id, &connection).unwrap().is_empty());
        assert_eq!(get_selected_table_id(user.id, &connection), Ok(None));
        assert_eq!(get_categories_by_table(other_table.id, &connection).unwrap().len(), 6);
    }

    #[test]
    fn delete_missing_table_is_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(delete_budget_table(42, &connection), Err(Error::BudgetTableNotFound));
    }
}
