use rusqlite::{params, Connection};

use crate::models::Feedback;

pub fn create_feedback(
    conn: &Connection,
    username: &str,
    rating: u8,
    message: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO feedback (username, rating, message) VALUES (?1, ?2, ?3)",
        params![username, rating, message],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent feedback first.
pub fn list_feedback(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<Feedback>> {
    let mut stmt = conn.prepare(
        "SELECT username, rating, message, date(created_at)
         FROM feedback
         ORDER BY created_at DESC, id DESC
         LIMIT ?",
    )?;
    let items: rusqlite::Result<Vec<Feedback>> = stmt
        .query_map([limit], |row| {
            Ok(Feedback {
                username: row.get(0)?,
                rating: row.get(1)?,
                message: row.get(2)?,
                date: row.get(3)?,
            })
        })?
        .collect();
    items
}

pub fn count_feedback(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
}
