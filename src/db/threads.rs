//! Thread table operations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::get_timestamp;
use crate::domain::Thread;

const THREAD_COLUMNS: &str = "id, author_id, title, body, created_at";

fn thread_from_row(row: &Row<'_>) -> Result<Thread> {
    Ok(Thread {
        id: row.get(0)?,
        author_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
    })
}

/// All threads, oldest first
pub fn list_threads(conn: &Connection) -> Result<Vec<Thread>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM threads ORDER BY id", THREAD_COLUMNS))?;
    let threads = stmt
        .query_map([], thread_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(threads)
}

pub fn get_thread(conn: &Connection, thread_id: i64) -> Result<Option<Thread>> {
    conn.query_row(
        &format!("SELECT {} FROM threads WHERE id = ?1", THREAD_COLUMNS),
        params![thread_id],
        thread_from_row,
    )
    .optional()
}

/// Insert a thread authored by `author_id` and return the stored row
pub fn create_thread(conn: &Connection, author_id: i64, title: &str, body: &str) -> Result<Thread> {
    let now = Utc::now().to_rfc3339();
    conn.query_row(
        &format!(
            "INSERT INTO threads (author_id, title, body, created_at) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
            THREAD_COLUMNS
        ),
        params![author_id, title, body, now],
        thread_from_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{run_migrations, users};

    fn conn_with_author() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let author = users::create_user(&conn, "yoda", "yoda@dagobah.org", "h").unwrap();
        (conn, author.id)
    }

    #[test]
    fn test_create_and_get_thread() {
        let (conn, author_id) = conn_with_author();
        let thread = create_thread(&conn, author_id, "Swamp life", "It's damp").unwrap();
        assert_eq!(thread.author_id, author_id);
        assert_eq!(thread.title, "Swamp life");

        let fetched = get_thread(&conn, thread.id).unwrap().unwrap();
        assert_eq!(fetched, thread);
    }

    #[test]
    fn test_list_threads_in_insertion_order() {
        let (conn, author_id) = conn_with_author();
        assert!(list_threads(&conn).unwrap().is_empty());

        create_thread(&conn, author_id, "first", "a").unwrap();
        create_thread(&conn, author_id, "second", "b").unwrap();

        let titles: Vec<String> = list_threads(&conn)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_missing_thread() {
        let (conn, _) = conn_with_author();
        assert!(get_thread(&conn, 404).unwrap().is_none());
    }
}
