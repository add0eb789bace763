// models/src/medical/review.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl Review {
    pub fn stars(&self) -> String {
        let filled = self.rating.min(MAX_RATING) as usize;
        format!("{}{}", "*".repeat(filled), ".".repeat(MAX_RATING as usize - filled))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub doctor_id: i64,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.push(ValidationError::OutOfRange {
                field: "rating",
                detail: format!("{}-{}", MIN_RATING, MAX_RATING),
            });
        }
        errors.require("comment", &self.comment);
        errors.into_result(())
    }
}

/// Mean rating rounded to one decimal, `None` for no reviews.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(total) / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
