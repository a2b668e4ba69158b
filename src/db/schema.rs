use rusqlite::{params, Connection, Result};

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  username TEXT NOT NULL UNIQUE,
  email TEXT NOT NULL UNIQUE,
  pw_hash TEXT NOT NULL,
  created_at TEXT NOT NULL
);
"#;

const CREATE_THREADS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS threads (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  author_id INTEGER NOT NULL,
  title VARCHAR(100) NOT NULL,
  body TEXT NOT NULL,
  created_at TEXT NOT NULL,
  FOREIGN KEY (author_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_threads_author_id ON threads(author_id);
"#;

/// Create any tables that do not exist yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch("PRAGMA foreign_keys = ON;")?;

  create_table_if_missing(conn, "users", CREATE_USERS_TABLE)?;
  create_table_if_missing(conn, "threads", CREATE_THREADS_TABLE)?;
  Ok(())
}

fn create_table_if_missing(conn: &Connection, name: &str, ddl: &str) -> Result<()> {
  if table_exists(conn, name)? {
    tracing::debug!("Table {} found, no need to create it", name);
    return Ok(());
  }
  tracing::info!("Creating {} table", name);
  conn.execute_batch(ddl)
}

pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
  let count: i64 = conn.query_row(
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
    params![name],
    |row| row.get(0),
  )?;
  Ok(count > 0)
}
