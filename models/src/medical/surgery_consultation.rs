// models/src/medical/surgery_consultation.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::{Priority, SurgeryStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgeryConsultation {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub surgery_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub urgency: Priority,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: SurgeryStatus,
    #[serde(default)]
    pub doctor_notes: Option<String>,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurgeryConsultation {
    pub surgery_type: String,
    pub description: String,
    pub urgency: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    pub preferred_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

impl NewSurgeryConsultation {
    pub fn validate(&self, today: NaiveDate) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.require("surgeryType", &self.surgery_type);
        errors.require("description", &self.description);
        if self.preferred_date < today {
            errors.push(ValidationError::Invalid {
                field: "preferredDate",
                message: "preferred date is in the past".into(),
            });
        }
        errors.into_result(())
    }
}
