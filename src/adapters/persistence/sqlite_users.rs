//! libsql-backed user directory. Implements UserDirectory over the `users` table.
//!
//! The table is filled by the bot's sign-up flow; this side only reads it. The
//! schema is created on connect so a fresh database starts out empty instead of failing.
//! Accepts a local file path or a remote `libsql://` URL (with auth token).

use crate::domain::{DomainError, User};
use crate::ports::UserDirectory;
use chrono::NaiveDateTime;
use libsql::{Database, Row, params};
use std::path::Path;
use tracing::info;

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
    username TEXT NOT NULL DEFAULT '',
    userid TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)"#;

/// SQLite `CURRENT_TIMESTAMP` format.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteUserDirectory {
    db: Database,
}

impl SqliteUserDirectory {
    /// Open the database and ensure the schema exists.
    /// Call this once at startup; the returned directory is safe to share via Arc.
    pub async fn connect(url: &str, auth_token: Option<&str>) -> Result<Self, DomainError> {
        let db = if is_remote(url) {
            libsql::Builder::new_remote(url.to_string(), auth_token.unwrap_or_default().to_string())
                .build()
                .await
                .map_err(|e| DomainError::Directory(e.to_string()))?
        } else {
            if let Some(parent) = Path::new(url).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| DomainError::Directory(e.to_string()))?;
            }
            libsql::Builder::new_local(url)
                .build()
                .await
                .map_err(|e| DomainError::Directory(e.to_string()))?
        };

        let conn = db.connect().map_err(|e| DomainError::Directory(e.to_string()))?;
        conn.execute(USERS_TABLE, ())
            .await
            .map_err(|e| DomainError::Directory(format!("create users table: {}", e)))?;

        info!(remote = is_remote(url), "user directory connected");
        Ok(Self { db })
    }

    /// Add a user and return the stored row.
    pub async fn register_user(
        &self,
        display_name: &str,
        external_id: &str,
    ) -> Result<User, DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        let mut rows = conn
            .query(
                r#"
                INSERT INTO users (username, userid) VALUES (?1, ?2)
                RETURNING id, username, userid, created_at
                "#,
                params![display_name, external_id],
            )
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        let row = rows
            .next()
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?
            .ok_or_else(|| DomainError::Directory("insert returned no row".to_string()))?;
        row_to_user(&row)
    }
}

fn is_remote(url: &str) -> bool {
    ["libsql://", "https://", "http://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

fn row_to_user(row: &Row) -> Result<User, DomainError> {
    let id: String = row.get(0).map_err(|e| DomainError::Directory(e.to_string()))?;
    let display_name: String = row.get::<String>(1).unwrap_or_default();
    let external_id: String = row.get(2).map_err(|e| DomainError::Directory(e.to_string()))?;
    let created_at = row
        .get::<String>(3)
        .ok()
        .and_then(|s| NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).ok());
    Ok(User {
        id,
        display_name,
        external_id,
        created_at,
    })
}

#[async_trait::async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        let mut rows = conn
            .query(
                "SELECT id, username, userid, created_at FROM users ORDER BY created_at, rowid",
                (),
            )
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?
        {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("libsql://digest-bot.turso.io"));
        assert!(is_remote("https://db.example.com"));
        assert!(!is_remote("./data/users.db"));
    }

    #[tokio::test]
    async fn test_fresh_database_has_no_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.db");
        let directory = SqliteUserDirectory::connect(path.to_str().unwrap(), None)
            .await
            .unwrap();

        assert!(directory.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_registered_users_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");
        let directory = SqliteUserDirectory::connect(path.to_str().unwrap(), None)
            .await
            .unwrap();

        let alice = directory.register_user("alice", "42").await.unwrap();
        directory.register_user("bob", "not-a-number").await.unwrap();

        assert_eq!(alice.id.len(), 32);
        assert!(alice.created_at.is_some());

        let users = directory.list_users().await.unwrap();
        let pairs: Vec<(&str, &str)> = users
            .iter()
            .map(|u| (u.display_name.as_str(), u.external_id.as_str()))
            .collect();
        assert_eq!(pairs, [("alice", "42"), ("bob", "not-a-number")]);
        assert_eq!(users[0], alice);
    }
}
