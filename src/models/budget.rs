use serde::{Deserialize, Serialize};

use crate::date_utils::YearMonth;
use crate::error::AppResult;
use crate::models::money;
use crate::models::transaction::required_text;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub category: String,
    pub month: YearMonth,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category: String,
    pub month: YearMonth,
    pub amount_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub category: String,
    pub month: YearMonth,
    pub amount: f64,
}

impl BudgetRequest {
    pub fn validate(self) -> AppResult<NewBudget> {
        Ok(NewBudget {
            category: required_text("category", &self.category)?,
            month: self.month,
            amount_cents: money::decimal_to_cents("amount", self.amount)?,
        })
    }
}
