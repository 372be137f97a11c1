use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Month, OffsetDateTime};

use budget_tables::{
    PasswordHash, UpsertMode, ValidatedPassword, create_budget_table, create_user,
    get_categories_by_table, initialize_db, upsert_entry,
};

/// A utility for creating a test database for the budget_tables server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Monthly amounts for the default categories, in the order they are created.
const MONTHLY_AMOUNTS: [i64; 6] = [5000, 1800, 80, 120, 60, 450];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        EmailAddress::new_unchecked("test@example.com"),
        password_hash,
        &conn,
    )?;

    let today = OffsetDateTime::now_utc().date();
    println!("Creating a table for {}...", today.year());

    let table = create_budget_table(user.id, today.year(), Some("Household"), &conn)?;
    let categories = get_categories_by_table(table.id, &conn)?;

    for month_number in 1..=u8::from(today.month()) {
        let month = Month::try_from(month_number)?;

        for (category, amount) in categories.iter().zip(MONTHLY_AMOUNTS) {
            // Vary the amounts a little so the charts are not flat.
            let amount = Decimal::from(amount) + Decimal::new(i64::from(month_number) * 1234, 2);
            upsert_entry(&table, category.id, month, amount, UpsertMode::Replace, &conn)?;
        }
    }

    println!("Success! Log in with test@example.com and the password 'test'.");

    Ok(())
}
