use rusqlite::{params, Connection};
use tracing::debug;

use crate::date_utils::YearMonth;
use crate::models::{Budget, NewBudget};

pub fn list_budgets(
    conn: &Connection,
    user_id: i64,
    month: YearMonth,
) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category, month, amount_cents
         FROM budgets
         WHERE user_id = ?1 AND month = ?2
         ORDER BY category",
    )?;
    let budgets: rusqlite::Result<Vec<Budget>> = stmt
        .query_map(params![user_id, month], |row| {
            Ok(Budget {
                id: row.get(0)?,
                user_id: row.get(1)?,
                category: row.get(2)?,
                month: row.get(3)?,
                amount_cents: row.get(4)?,
            })
        })?
        .collect();
    budgets
}

/// Insert or replace the amount of the (user, category, month) budget.
/// Concurrent writers resolve as last-writer-wins on the unique key.
pub fn upsert_budget(conn: &Connection, user_id: i64, budget: &NewBudget) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO budgets (user_id, category, month, amount_cents)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (user_id, category, month)
         DO UPDATE SET amount_cents = excluded.amount_cents",
        params![user_id, budget.category, budget.month, budget.amount_cents],
    )?;
    debug!(user_id, category = %budget.category, month = %budget.month, "Budget set");
    Ok(())
}
