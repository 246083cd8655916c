use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::transactions::{param_refs, TransactionFilter};
use crate::date_utils::YearMonth;
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str =
    "SELECT id, user_id, date, amount_cents, category, description, payment_method FROM expenses";

fn map_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        amount_cents: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        payment_method: row.get(6)?,
    })
}

/// Expenses matching `filter`, newest first.
pub fn list_expenses(
    conn: &Connection,
    filter: &TransactionFilter,
) -> rusqlite::Result<Vec<Expense>> {
    let mut sql = String::from(EXPENSE_COLUMNS);
    let mut params_vec = filter.push_conditions(&mut sql, "category");
    sql.push_str(" ORDER BY date DESC, id DESC");

    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let expenses = stmt
        .query_map(param_refs(&params_vec).as_slice(), map_expense)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(user_id = filter.user_id, count = expenses.len(), "Listed expenses");
    Ok(expenses)
}

pub fn sum_expenses(conn: &Connection, filter: &TransactionFilter) -> rusqlite::Result<i64> {
    let mut sql = String::from("SELECT COALESCE(SUM(amount_cents), 0) FROM expenses");
    let params_vec = filter.push_conditions(&mut sql, "category");
    conn.query_row(&sql, param_refs(&params_vec).as_slice(), |row| row.get(0))
}

pub fn create_expense(
    conn: &Connection,
    user_id: i64,
    expense: &NewExpense,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO expenses (user_id, date, amount_cents, category, description, payment_method)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            expense.date,
            expense.amount_cents,
            expense.category,
            expense.description,
            expense.payment_method,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id, expense_id = id, "Created expense");
    Ok(id)
}

/// Returns the number of deleted rows; 0 when the id does not belong to the user.
pub fn delete_expense(conn: &Connection, user_id: i64, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )
}

/// Per-month expense sums, ascending by month.
pub fn monthly_totals(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<(YearMonth, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT substr(date, 1, 7) AS month, SUM(amount_cents)
         FROM expenses
         WHERE user_id = ?
         GROUP BY month
         ORDER BY month",
    )?;
    let rows: rusqlite::Result<Vec<_>> = stmt
        .query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();
    rows
}

/// Lifetime expense sums per category, largest first.
pub fn category_totals(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT category, SUM(amount_cents) AS total
         FROM expenses
         WHERE user_id = ?
         GROUP BY category
         ORDER BY total DESC, category",
    )?;
    let rows: rusqlite::Result<Vec<_>> = stmt
        .query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();
    rows
}

/// Total expense volume across every user.
pub fn total_volume(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses",
        [],
        |row| row.get(0),
    )
}
