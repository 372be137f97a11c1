//! Users, their credentials and their saved table selection.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash, budget_table::BudgetTableId};

/// A newtype wrapper for integer user IDs.
///
/// This keeps user IDs from being mixed up with table, category and entry IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user logs in with.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// `selected_table_id` is the table the user last looked at. It is cleared
/// when that table is deleted.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                selected_table_id INTEGER REFERENCES budget_table(id) ON DELETE SET NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email address is already
/// registered, ignoring case, or [Error::SqlError] for other SQL errors.
pub fn create_user(
    email: EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    match connection.execute(
        "INSERT INTO user (email, password) VALUES (?1, ?2)",
        (email.as_str(), password_hash.as_ref()),
    ) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(error, Some(_))) if error.extended_code == 2067 => {
            return Err(Error::DuplicateEmail);
        }
        Err(error) => return Err(error.into()),
    }

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email,
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`, ignoring case.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that email address.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email.trim())], map_row)
        .map_err(|error| error.into())
}

/// Get the ID of the table the user last selected, if any.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn get_selected_table_id(
    user_id: UserID,
    connection: &Connection,
) -> Result<Option<BudgetTableId>, Error> {
    connection
        .query_row(
            "SELECT selected_table_id FROM user WHERE id = ?1",
            (user_id.as_i64(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Save `table_id` as the user's selected table, or clear it with `None`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn set_selected_table_id(
    user_id: UserID,
    table_id: Option<BudgetTableId>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET selected_table_id = ?1 WHERE id = ?2",
        (table_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
