use rusqlite::Connection;

use crate::{
    PasswordHash, User,
    auth::create_user,
    db::initialize,
};

/// An in-memory database with every table created and foreign keys enabled.
pub(crate) fn get_test_db_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

pub(crate) fn insert_test_user(connection: &Connection) -> User {
    insert_test_user_with_email("test@example.com", connection)
}

pub(crate) fn insert_test_user_with_email(email: &str, connection: &Connection) -> User {
    create_user(
        email.parse().expect("Could not parse test email"),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}
