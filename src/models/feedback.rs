use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::transaction::required_text;

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    #[serde(rename = "user")]
    pub username: String,
    pub rating: u8,
    pub message: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    pub message: String,
}

impl FeedbackRequest {
    pub fn validate(self) -> AppResult<Self> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::Validation(
                "rating must be between 1 and 5".into(),
            ));
        }
        Ok(Self {
            rating: self.rating,
            message: required_text("message", &self.message)?,
        })
    }
}
