//! Relational storage for registered users.

pub mod sqlite_users;

pub use sqlite_users::SqliteUserDirectory;
