//! Storage for entries.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use time::Month;

use crate::{
    Error,
    budget_table::{BudgetTable, BudgetTableId},
    category::{CategoryId, get_category},
    entry::{Entry, UpsertMode, domain::entry_date},
    money::{MAX_AMOUNT_CENTS, from_cents, to_cents},
};

/// The extended SQLite error code for a failed CHECK constraint.
const SQLITE_CONSTRAINT_CHECK: i32 = 275;

/// Record `amount` against `category_id` for `month` of `table`.
///
/// Entries are dated on the 15th of the month in the table's year, and there
/// is at most one entry per category and date. If an entry already exists it
/// is updated according to `mode`, otherwise a new entry without a
/// description is created. The insert or update is a single statement so
/// concurrent writes to the same month cannot lose an update.
///
/// # Errors
///
/// Returns:
/// - [Error::CategoryNotFound] if the category does not exist,
/// - [Error::CategoryNotInTable] if the category belongs to another table,
/// - [Error::InvalidAmount] if the amount, or the accumulated amount, is
///   larger than [crate::money::MAX_AMOUNT],
/// - [Error::SqlError] if there is some other SQL error.
pub fn upsert_entry(
    table: &BudgetTable,
    category_id: CategoryId,
    month: Month,
    amount: Decimal,
    mode: UpsertMode,
    connection: &Connection,
) -> Result<Entry, Error> {
    let category = get_category(category_id, connection)?;

    if category.table_id != table.id {
        return Err(Error::CategoryNotInTable);
    }

    let date = entry_date(table.year, month)?;
    let cents = to_cents(amount)?;

    let on_conflict = match mode {
        UpsertMode::Accumulate => "amount = entry.amount + excluded.amount",
        UpsertMode::Replace => "amount = excluded.amount",
    };
    let query = format!(
        "INSERT INTO entry (table_id, category_id, date, amount) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(table_id, category_id, date) DO UPDATE SET {on_conflict}
        RETURNING id, table_id, category_id, date, amount, description"
    );

    connection
        .prepare(&query)?
        .query_row((table.id, category_id, date, cents), map_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == SQLITE_CONSTRAINT_CHECK =>
            {
                tracing::warn!("entry amount out of range after adding {amount}");
                Error::InvalidAmount(amount.to_string())
            }
            error => error.into(),
        })
}

/// Get every entry of the table with `table_id`, oldest first.
pub fn get_entries_by_table(
    table_id: BudgetTableId,
    connection: &Connection,
) -> Result<Vec<Entry>, Error> {
    connection
        .prepare(
            "SELECT id, table_id, category_id, date, amount, description FROM entry
            WHERE table_id = :table_id
            ORDER BY date ASC, id ASC",
        )?
        .query_map(&[(":table_id", &table_id)], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // SQLite turns integer overflow into a REAL, so amounts are checked here too.
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS entry (
            id INTEGER PRIMARY KEY,
            table_id INTEGER NOT NULL REFERENCES budget_table(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (
                typeof(amount) = 'integer' AND abs(amount) <= {MAX_AMOUNT_CENTS}
            ),
            description TEXT,
            UNIQUE(table_id, category_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_entry_category_id ON entry(category_id);"
    ))
}

fn map_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    Ok(Entry {
        id: row.get(0)?,
        table_id: row.get(1)?,
        category_id: row.get(2)?,
        date: row.get(3)?,
        amount: from_cents(row.get(4)?),
        description: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{Month, macros::date};

    use crate::{
        Error,
        budget_table::{BudgetTable, create_budget_table},
        category::{Category, get_categories_by_table},
        entry::{UpsertMode, get_entries_by_table, upsert_entry},
        money::MAX_AMOUNT,
        rollup::load_categories_with_entries,
        test_utils::{get_test_db_connection, insert_test_user},
    };

    fn setup() -> (rusqlite::Connection, BudgetTable, Vec<Category>) {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let table = create_budget_table(user.id, 2025, None, &connection).unwrap();
        let categories = get_categories_by_table(table.id, &connection).unwrap();

        (connection, table, categories)
    }

    #[test]
    fn upsert_creates_entry_on_the_fifteenth() {
        let (connection, table, categories) = setup();
        let rent = &categories[1];

        let entry = upsert_entry(
            &table,
            rent.id,
            Month::March,
            Decimal::new(120050, 2),
            UpsertMode::Accumulate,
            &connection,
        )
        .unwrap();

        assert_eq!(entry.table_id, table.id);
        assert_eq!(entry.category_id, rent.id);
        assert_eq!(entry.date, date!(2025 - 03 - 15));
        assert_eq!(entry.amount, Decimal::new(120050, 2));
        assert_eq!(entry.description, None);
        assert_eq!(get_entries_by_table(table.id, &connection).unwrap(), vec![entry]);
    }

    #[test]
    fn accumulate_adds_to_existing_entry() {
        let (connection, table, categories) = setup();
        let groceries = &categories[5];
        let apply = |amount: Decimal| {
            upsert_entry(
                &table,
                groceries.id,
                Month::June,
                amount,
                UpsertMode::Accumulate,
                &connection,
            )
            .unwrap()
        };

        apply(Decimal::new(3050, 2));
        let entry = apply(Decimal::new(1225, 2));

        assert_eq!(entry.amount, Decimal::new(4275, 2));
        assert_eq!(get_entries_by_table(table.id, &connection).unwrap().len(), 1);
    }

    #[test]
    fn accumulating_twice_equals_accumulating_the_sum() {
        let (connection, table, categories) = setup();
        let groceries = &categories[5];
        let gas = &categories[4];
        let a = Decimal::new(1999, 2);
        let b = Decimal::new(-501, 2);

        upsert_entry(&table, groceries.id, Month::May, a, UpsertMode::Accumulate, &connection)
            .unwrap();
        let twice =
            upsert_entry(&table, groceries.id, Month::May, b, UpsertMode::Accumulate, &connection)
                .unwrap();
        let once =
            upsert_entry(&table, gas.id, Month::May, a + b, UpsertMode::Accumulate, &connection)
                .unwrap();

        assert_eq!(twice.amount, once.amount);
    }

    #[test]
    fn replace_overwrites_and_is_idempotent() {
        let (connection, table, categories) = setup();
        let internet = &categories[2];
        upsert_entry(
            &table,
            internet.id,
            Month::July,
            Decimal::from(90),
            UpsertMode::Accumulate,
            &connection,
        )
        .unwrap();

        let first = upsert_entry(
            &table,
            internet.id,
            Month::July,
            Decimal::from(75),
            UpsertMode::Replace,
            &connection,
        )
        .unwrap();
        let second = upsert_entry(
            &table,
            internet.id,
            Month::July,
            Decimal::from(75),
            UpsertMode::Replace,
            &connection,
        )
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.amount, Decimal::from(75));
        assert_eq!(get_entries_by_table(table.id, &connection).unwrap().len(), 1);
    }

    #[test]
    fn different_months_get_separate_entries() {
        let (connection, table, categories) = setup();
        let salary = &categories[0];

        for month in [Month::January, Month::February] {
            upsert_entry(
                &table,
                salary.id,
                month,
                Decimal::from(5000),
                UpsertMode::Accumulate,
                &connection,
            )
            .unwrap();
        }

        let dates: Vec<_> = get_entries_by_table(table.id, &connection)
            .unwrap()
            .into_iter()
            .map(|entry| entry.date)
            .collect();
        assert_eq!(dates, vec![date!(2025 - 01 - 15), date!(2025 - 02 - 15)]);
    }

    #[test]
    fn upsert_rejects_category_from_another_table() {
        let (connection, table, _) = setup();
        let other_table = create_budget_table(table.user_id, 2026, None, &connection).unwrap();
        let other_rent = get_categories_by_table(other_table.id, &connection).unwrap()[1].clone();

        let result = upsert_entry(
            &table,
            other_rent.id,
            Month::March,
            Decimal::from(1200),
            UpsertMode::Accumulate,
            &connection,
        );

        assert_eq!(result, Err(Error::CategoryNotInTable));
        assert!(get_entries_by_table(table.id, &connection).unwrap().is_empty());
        assert!(get_entries_by_table(other_table.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn upsert_rejects_missing_category() {
        let (connection, table, _) = setup();

        let result = upsert_entry(
            &table,
            999,
            Month::March,
            Decimal::from(1200),
            UpsertMode::Accumulate,
            &connection,
        );

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn database_rejects_duplicate_month_rows() {
        let (connection, table, categories) = setup();
        let rent = &categories[1];
        let insert = || {
            connection.execute(
                "INSERT INTO entry (table_id, category_id, date, amount) VALUES (?1, ?2, ?3, ?4)",
                (table.id, rent.id, date!(2025 - 03 - 15), 100),
            )
        };

        insert().unwrap();
        let result = insert();

        assert!(result.is_err());
    }

    #[test]
    fn accumulating_past_the_limit_fails_and_keeps_the_table_readable() {
        let (connection, table, categories) = setup();
        let salary = &categories[0];
        let large_amount = MAX_AMOUNT - Decimal::from(1);
        let accumulate = || {
            upsert_entry(
                &table,
                salary.id,
                Month::April,
                large_amount,
                UpsertMode::Accumulate,
                &connection,
            )
        };

        accumulate().unwrap();
        let result = accumulate();

        assert_eq!(result, Err(Error::InvalidAmount(large_amount.to_string())));
        let entries = get_entries_by_table(table.id, &connection).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, large_amount);
        assert!(load_categories_with_entries(table.id, &connection).is_ok());
    }

    #[test]
    fn database_rejects_non_integer_amounts() {
        let (connection, table, categories) = setup();
        let rent = &categories[1];

        let result = connection.execute(
            "INSERT INTO entry (table_id, category_id, date, amount) VALUES (?1, ?2, ?3, ?4)",
            (table.id, rent.id, date!(2025 - 03 - 15), 1.2e19),
        );

        assert!(result.is_err());
        assert!(get_entries_by_table(table.id, &connection).unwrap().is_empty());
    }
}
