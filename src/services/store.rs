//! Read interface the aggregation engine consumes.
//!
//! Every call is scoped to one user and returns owned value records, so the
//! engine never holds a connection or cursor beyond a single call.

use rusqlite::Connection;

use crate::date_utils::YearMonth;
use crate::db::queries::transactions::TransactionFilter;
use crate::db::queries::{budgets, expenses, incomes};
use crate::error::AppResult;
use crate::models::{Budget, Transaction, TransactionKind};

pub trait TransactionStore {
    /// Rows of `kind` matching `filter`, newest first.
    fn list(
        &self,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>>;

    /// Sum of amounts of `kind` matching `filter`; zero when nothing matches.
    fn sum(&self, kind: TransactionKind, filter: &TransactionFilter) -> AppResult<i64>;

    /// Per-month sums of `kind`, ascending by month.
    fn monthly_totals(
        &self,
        user_id: i64,
        kind: TransactionKind,
    ) -> AppResult<Vec<(YearMonth, i64)>>;

    /// Lifetime expense sums per category, largest first.
    fn category_totals(&self, user_id: i64) -> AppResult<Vec<(String, i64)>>;

    fn budgets(&self, user_id: i64, month: YearMonth) -> AppResult<Vec<Budget>>;
}

/// [`TransactionStore`] over a SQLite connection.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl TransactionStore for SqliteStore<'_> {
    fn list(
        &self,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        let rows = match kind {
            TransactionKind::Income => incomes::list_incomes(self.conn, filter)?
                .into_iter()
                .map(Transaction::from)
                .collect(),
            TransactionKind::Expense => expenses::list_expenses(self.conn, filter)?
                .into_iter()
                .map(Transaction::from)
                .collect(),
        };
        Ok(rows)
    }

    fn sum(&self, kind: TransactionKind, filter: &TransactionFilter) -> AppResult<i64> {
        let total = match kind {
            TransactionKind::Income => incomes::sum_incomes(self.conn, filter)?,
            TransactionKind::Expense => expenses::sum_expenses(self.conn, filter)?,
        };
        Ok(total)
    }

    fn monthly_totals(
        &self,
        user_id: i64,
        kind: TransactionKind,
    ) -> AppResult<Vec<(YearMonth, i64)>> {
        let totals = match kind {
            TransactionKind::Income => incomes::monthly_totals(self.conn, user_id)?,
            TransactionKind::Expense => expenses::monthly_totals(self.conn, user_id)?,
        };
        Ok(totals)
    }

    fn category_totals(&self, user_id: i64) -> AppResult<Vec<(String, i64)>> {
        Ok(expenses::category_totals(self.conn, user_id)?)
    }

    fn budgets(&self, user_id: i64, month: YearMonth) -> AppResult<Vec<Budget>> {
        Ok(budgets::list_budgets(self.conn, user_id, month)?)
    }
}
