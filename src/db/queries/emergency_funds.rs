use rusqlite::{params, Connection, OptionalExtension};

use crate::models::EmergencyFund;

/// Create the user's fund row with zero amounts unless it already exists.
pub fn ensure_fund(conn: &Connection, user_id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO emergency_funds (user_id) VALUES (?)",
        [user_id],
    )?;
    Ok(())
}

pub fn get_fund(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<EmergencyFund>> {
    conn.query_row(
        "SELECT target_amount_cents, current_amount_cents, alert_threshold_cents, monthly_goal_cents
         FROM emergency_funds
         WHERE user_id = ?",
        [user_id],
        |row| {
            Ok(EmergencyFund {
                target_amount_cents: row.get(0)?,
                current_amount_cents: row.get(1)?,
                alert_threshold_cents: row.get(2)?,
                monthly_goal_cents: row.get(3)?,
            })
        },
    )
    .optional()
}

/// Fetch the fund, creating it on first access.
pub fn get_or_create_fund(conn: &Connection, user_id: i64) -> rusqlite::Result<EmergencyFund> {
    ensure_fund(conn, user_id)?;
    Ok(get_fund(conn, user_id)?.unwrap_or_default())
}

pub fn save_fund(conn: &Connection, user_id: i64, fund: &EmergencyFund) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE emergency_funds
         SET target_amount_cents = ?2, current_amount_cents = ?3,
             alert_threshold_cents = ?4, monthly_goal_cents = ?5
         WHERE user_id = ?1",
        params![
            user_id,
            fund.target_amount_cents,
            fund.current_amount_cents,
            fund.alert_threshold_cents,
            fund.monthly_goal_cents,
        ],
    )?;
    Ok(())
}
