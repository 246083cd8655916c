use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::transactions::{param_refs, TransactionFilter};
use crate::date_utils::YearMonth;
use crate::models::{Income, NewIncome};

const INCOME_COLUMNS: &str =
    "SELECT id, user_id, date, amount_cents, source, description FROM incomes";

fn map_income(row: &Row<'_>) -> rusqlite::Result<Income> {
    Ok(Income {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        amount_cents: row.get(3)?,
        source: row.get(4)?,
        description: row.get(5)?,
    })
}

/// Incomes matching `filter`, newest first.
pub fn list_incomes(
    conn: &Connection,
    filter: &TransactionFilter,
) -> rusqlite::Result<Vec<Income>> {
    let mut sql = String::from(INCOME_COLUMNS);
    let mut params_vec = filter.push_conditions(&mut sql, "source");
    sql.push_str(" ORDER BY date DESC, id DESC");

    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let incomes = stmt
        .query_map(param_refs(&params_vec).as_slice(), map_income)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(user_id = filter.user_id, count = incomes.len(), "Listed incomes");
    Ok(incomes)
}

pub fn sum_incomes(conn: &Connection, filter: &TransactionFilter) -> rusqlite::Result<i64> {
    let mut sql = String::from("SELECT COALESCE(SUM(amount_cents), 0) FROM incomes");
    let params_vec = filter.push_conditions(&mut sql, "source");
    conn.query_row(&sql, param_refs(&params_vec).as_slice(), |row| row.get(0))
}

pub fn create_income(conn: &Connection, user_id: i64, income: &NewIncome) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO incomes (user_id, date, amount_cents, source, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            income.date,
            income.amount_cents,
            income.source,
            income.description,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id, income_id = id, "Created income");
    Ok(id)
}

pub fn delete_income(conn: &Connection, user_id: i64, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM incomes WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )
}

/// Per-month income sums, ascending by month.
pub fn monthly_totals(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<(YearMonth, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT substr(date, 1, 7) AS month, SUM(amount_cents)
         FROM incomes
         WHERE user_id = ?
         GROUP BY month
         ORDER BY month",
    )?;
    let rows: rusqlite::Result<Vec<_>> = stmt
        .query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();
    rows
}
