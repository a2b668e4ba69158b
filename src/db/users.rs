//! User table operations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::get_timestamp;
use crate::domain::User;

/// Insert a user and return it (without the hash)
pub fn create_user(conn: &Connection, username: &str, email: &str, pw_hash: &str) -> Result<User> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO users (username, email, pw_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, pw_hash, now],
    )?;
    let id = conn.last_insert_rowid();
    get_user_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Check if a username already exists
pub fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        params![username],
        |row| row.get(0),
    )
}

/// Check if an email is already registered
pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        params![email],
        |row| row.get(0),
    )
}

/// Get login credentials by username, returns (user_id, pw_hash)
pub fn get_credentials_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<(i64, String)>> {
    conn.query_row(
        "SELECT id, pw_hash FROM users WHERE username = ?1",
        params![username],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

pub fn get_user_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, email, created_at FROM users WHERE id = ?1",
        params![user_id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                created_at: get_timestamp(row, 3)?,
            })
        },
    )
    .optional()
}
