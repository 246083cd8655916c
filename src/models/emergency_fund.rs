use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::money;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmergencyFund {
    #[serde(rename = "target_amount", serialize_with = "money::as_decimal")]
    pub target_amount_cents: i64,
    #[serde(rename = "current_amount", serialize_with = "money::as_decimal")]
    pub current_amount_cents: i64,
    #[serde(rename = "alert_threshold", serialize_with = "money::as_decimal")]
    pub alert_threshold_cents: i64,
    #[serde(rename = "monthly_goal", serialize_with = "money::as_decimal")]
    pub monthly_goal_cents: i64,
}

impl EmergencyFund {
    /// Progress towards the target, rounded to one decimal. Zero when no
    /// target is set.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount_cents > 0 {
            let pct = self.current_amount_cents as f64 / self.target_amount_cents as f64 * 100.0;
            (pct * 10.0).round() / 10.0
        } else {
            0.0
        }
    }

    pub fn summary(self) -> EmergencyFundSummary {
        EmergencyFundSummary {
            progress_percentage: self.progress_percentage(),
            fund: self,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmergencyFundSummary {
    #[serde(flatten)]
    pub fund: EmergencyFund,
    pub progress_percentage: f64,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmergencyFundUpdate {
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub alert_threshold: Option<f64>,
    pub monthly_goal: Option<f64>,
}

impl EmergencyFundUpdate {
    pub fn apply(&self, fund: &mut EmergencyFund) -> AppResult<()> {
        if let Some(v) = self.target_amount {
            fund.target_amount_cents = money::decimal_to_cents("target_amount", v)?;
        }
        if let Some(v) = self.current_amount {
            fund.current_amount_cents = money::decimal_to_cents("current_amount", v)?;
        }
        if let Some(v) = self.alert_threshold {
            fund.alert_threshold_cents = money::decimal_to_cents("alert_threshold", v)?;
        }
        if let Some(v) = self.monthly_goal {
            fund.monthly_goal_cents = money::decimal_to_cents("monthly_goal", v)?;
        }
        Ok(())
    }
}
