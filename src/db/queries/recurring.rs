use rusqlite::{params, Connection};

use crate::models::{Frequency, NewRecurringExpense, RecurringExpense};

pub fn list_recurring(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<RecurringExpense>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, description, amount_cents, category, frequency, next_due_date
         FROM recurring_expenses
         WHERE user_id = ?
         ORDER BY next_due_date, id",
    )?;
    let items: rusqlite::Result<Vec<RecurringExpense>> = stmt
        .query_map([user_id], |row| {
            let frequency: String = row.get(5)?;
            let frequency: Frequency = frequency.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(RecurringExpense {
                id: row.get(0)?,
                user_id: row.get(1)?,
                description: row.get(2)?,
                amount_cents: row.get(3)?,
                category: row.get(4)?,
                frequency,
                next_due_date: row.get(6)?,
            })
        })?
        .collect();
    items
}

pub fn create_recurring(
    conn: &Connection,
    user_id: i64,
    item: &NewRecurringExpense,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO recurring_expenses
            (user_id, description, amount_cents, category, frequency, next_due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            item.description,
            item.amount_cents,
            item.category,
            item.frequency.as_str(),
            item.next_due_date,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_recurring(conn: &Connection, user_id: i64, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM recurring_expenses WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )
}
