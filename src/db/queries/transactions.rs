//! Filtering shared by the income and expense tables.

use chrono::NaiveDate;
use rusqlite::ToSql;

/// Row filter for income/expense queries. Every query is scoped to one user.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub user_id: i64,
    /// Inclusive lower bound.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to_date: Option<NaiveDate>,
    /// Matches the expense category or the income source.
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl TransactionFilter {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn between(user_id: i64, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            user_id,
            from_date: Some(from),
            to_date: Some(to),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Append the WHERE conditions to `sql` and return the bound parameters.
    /// `category_column` is `category` for expenses and `source` for incomes.
    pub(crate) fn push_conditions(
        &self,
        sql: &mut String,
        category_column: &str,
    ) -> Vec<Box<dyn ToSql>> {
        let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(self.user_id)];
        sql.push_str(" WHERE user_id = ?");

        if let Some(from_date) = self.from_date {
            sql.push_str(" AND date >= ?");
            params_vec.push(Box::new(from_date));
        }
        if let Some(to_date) = self.to_date {
            sql.push_str(" AND date <= ?");
            params_vec.push(Box::new(to_date));
        }
        if let Some(ref category) = self.category {
            sql.push_str(&format!(" AND {} = ?", category_column));
            params_vec.push(Box::new(category.clone()));
        }
        params_vec
    }
}

pub(crate) fn param_refs(params_vec: &[Box<dyn ToSql>]) -> Vec<&dyn ToSql> {
    params_vec.iter().map(|p| p.as_ref()).collect()
}
