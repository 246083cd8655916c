use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::money;
use crate::models::transaction::{required_date, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(AppError::Validation(format!(
                "Unknown frequency '{}', expected weekly, monthly, quarterly or yearly",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringExpense {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub description: String,
    #[serde(rename = "amount", serialize_with = "money::as_decimal")]
    pub amount_cents: i64,
    pub category: String,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewRecurringExpense {
    pub description: String,
    pub amount_cents: i64,
    pub category: String,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RecurringRequest {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub frequency: String,
    pub next_due_date: String,
}

impl RecurringRequest {
    pub fn validate(self) -> AppResult<NewRecurringExpense> {
        Ok(NewRecurringExpense {
            description: required_text("description", &self.description)?,
            amount_cents: money::decimal_to_cents("amount", self.amount)?,
            category: required_text("category", &self.category)?,
            frequency: self.frequency.parse()?,
            next_due_date: required_date(&self.next_due_date)?,
        })
    }
}
