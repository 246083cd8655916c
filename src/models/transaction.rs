use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::parse_date;
use crate::error::{AppError, AppResult};
use crate::models::money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub date: NaiveDate,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
    pub category: String,
    pub description: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Income {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub date: NaiveDate,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
    pub source: String,
    pub description: Option<String>,
}

/// Income and expense rows merged into one tagged record before bucketing
/// or ledger building.
#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    Income(Income),
    Expense(Expense),
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Income(_) => TransactionKind::Income,
            Transaction::Expense(_) => TransactionKind::Expense,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Transaction::Income(i) => i.id,
            Transaction::Expense(e) => e.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Transaction::Income(i) => i.date,
            Transaction::Expense(e) => e.date,
        }
    }

    pub fn amount_cents(&self) -> i64 {
        match self {
            Transaction::Income(i) => i.amount_cents,
            Transaction::Expense(e) => e.amount_cents,
        }
    }

    /// Category for expenses, source for incomes.
    pub fn category_or_source(&self) -> &str {
        match self {
            Transaction::Income(i) => &i.source,
            Transaction::Expense(e) => &e.category,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Transaction::Income(i) => i.description.as_deref(),
            Transaction::Expense(e) => e.description.as_deref(),
        }
    }
}

impl From<Income> for Transaction {
    fn from(income: Income) -> Self {
        Transaction::Income(income)
    }
}

impl From<Expense> for Transaction {
    fn from(expense: Expense) -> Self {
        Transaction::Expense(expense)
    }
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub category: String,
    pub description: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewIncome {
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub source: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

impl ExpenseRequest {
    pub fn validate(self) -> AppResult<NewExpense> {
        Ok(NewExpense {
            date: required_date(&self.date)?,
            amount_cents: money::decimal_to_cents("amount", self.amount)?,
            category: required_text("category", &self.category)?,
            description: optional_text(self.description),
            payment_method: optional_text(self.payment_method),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IncomeRequest {
    pub amount: f64,
    pub source: String,
    pub date: String,
    pub description: Option<String>,
}

impl IncomeRequest {
    pub fn validate(self) -> AppResult<NewIncome> {
        Ok(NewIncome {
            date: required_date(&self.date)?,
            amount_cents: money::decimal_to_cents("amount", self.amount)?,
            source: required_text("source", &self.source)?,
            description: optional_text(self.description),
        })
    }
}

pub(crate) fn required_date(value: &str) -> AppResult<NaiveDate> {
    parse_date(value).ok_or_else(|| {
        AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

pub(crate) fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
