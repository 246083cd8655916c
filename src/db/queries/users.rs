use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::{NewUser, User};

pub(crate) const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.password_hash, u.user_type, u.is_admin, date(u.joined_at)";

pub(crate) fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        user_type: row.get(4)?,
        is_admin: row.get(5)?,
        joined_at: row.get(6)?,
    })
}

pub fn create_user(conn: &Connection, user: &NewUser) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, user_type) VALUES (?1, ?2, ?3, ?4)",
        params![user.username, user.email, user.password_hash, user.user_type],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id = id, username = %user.username, "Created user");
    Ok(id)
}

/// The `users` column named by a UNIQUE constraint failure, if `err` is one.
pub fn unique_violation_column(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            msg.strip_prefix("UNIQUE constraint failed: users.")
        }
        _ => None,
    }
}

pub fn get_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users u WHERE u.id = ?", USER_COLUMNS),
        [id],
        map_user,
    )
    .optional()
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users u WHERE u.username = ?", USER_COLUMNS),
        [username],
        map_user,
    )
    .optional()
}

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users u WHERE u.email = ?", USER_COLUMNS),
        [email],
        map_user,
    )
    .optional()
}

/// Whether another user (other than `exclude_id`) already holds `username`.
pub fn username_taken(
    conn: &Connection,
    username: &str,
    exclude_id: Option<i64>,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 AND id != ?2)",
        params![username, exclude_id.unwrap_or(-1)],
        |row| row.get(0),
    )
}

pub fn email_taken(
    conn: &Connection,
    email: &str,
    exclude_id: Option<i64>,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1 AND id != ?2)",
        params![email, exclude_id.unwrap_or(-1)],
        |row| row.get(0),
    )
}

pub fn update_profile(
    conn: &Connection,
    id: i64,
    username: &str,
    email: &str,
    user_type: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users SET username = ?2, email = ?3, user_type = ?4 WHERE id = ?1",
        params![id, username, email, user_type],
    )?;
    Ok(())
}

pub fn update_password_hash(
    conn: &Connection,
    id: i64,
    password_hash: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users SET password_hash = ?2 WHERE id = ?1",
        params![id, password_hash],
    )?;
    Ok(())
}

pub fn set_admin(conn: &Connection, id: i64, is_admin: bool) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users SET is_admin = ?2 WHERE id = ?1",
        params![id, is_admin],
    )?;
    Ok(())
}

pub fn count_users(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}

pub fn list_users(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users u ORDER BY u.id LIMIT ?",
        USER_COLUMNS
    ))?;
    let users: rusqlite::Result<Vec<User>> = stmt.query_map([limit], map_user)?.collect();
    users
}
