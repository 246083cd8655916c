//! Server-side bearer and password-reset tokens.
//!
//! Expiry is computed by SQLite in UTC (`datetime('now', ...)`) so issuing
//! and checking always use the same clock.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::users::{map_user, USER_COLUMNS};
use crate::models::User;

pub fn create_session(
    conn: &Connection,
    token: &str,
    user_id: i64,
    ttl_days: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id, expires_at)
         VALUES (?1, ?2, datetime('now', ?3))",
        params![token, user_id, format!("{:+} days", ttl_days)],
    )?;
    debug!(user_id, "Session created");
    Ok(())
}

/// The user owning a live (unexpired) session token.
pub fn find_session_user(conn: &Connection, token: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ? AND s.expires_at > datetime('now')",
            USER_COLUMNS
        ),
        [token],
        map_user,
    )
    .optional()
}

pub fn delete_session(conn: &Connection, token: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM sessions WHERE token = ?", [token])
}

pub fn delete_user_sessions(conn: &Connection, user_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM sessions WHERE user_id = ?", [user_id])
}

pub fn purge_expired(conn: &Connection) -> rusqlite::Result<usize> {
    let sessions = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= datetime('now')",
        [],
    )?;
    let resets = conn.execute(
        "DELETE FROM password_resets WHERE expires_at <= datetime('now')",
        [],
    )?;
    Ok(sessions + resets)
}

pub fn create_password_reset(
    conn: &Connection,
    token: &str,
    user_id: i64,
    ttl_minutes: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO password_resets (token, user_id, expires_at)
         VALUES (?1, ?2, datetime('now', ?3))",
        params![token, user_id, format!("{:+} minutes", ttl_minutes)],
    )?;
    Ok(())
}

/// Consume a reset token, returning its user id if it was live.
/// A token can be redeemed at most once.
pub fn take_password_reset(conn: &Connection, token: &str) -> rusqlite::Result<Option<i64>> {
    let taken: Option<(i64, bool)> = conn
        .query_row(
            "DELETE FROM password_resets WHERE token = ?
             RETURNING user_id, expires_at > datetime('now')",
            [token],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(taken.and_then(|(user_id, live)| live.then_some(user_id)))
}
