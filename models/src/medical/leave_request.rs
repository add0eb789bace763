// models/src/medical/leave_request.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::LeaveStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: i64,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: LeaveStatus,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl LeaveRequest {
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub doctor_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl NewLeaveRequest {
    pub fn validate(&self, today: NaiveDate) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.require("reason", &self.reason);
        if self.start_date < today {
            errors.push(ValidationError::Invalid {
                field: "startDate",
                message: "leave cannot start in the past".into(),
            });
        }
        if self.end_date < self.start_date {
            errors.push(ValidationError::Invalid {
                field: "endDate",
                message: "end date is before start date".into(),
            });
        }
        errors.into_result(())
    }
}

/// Body of `PATCH /api/leave-requests/:id/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDecision {
    pub status: LeaveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn range_must_be_ordered_and_upcoming() {
        let request = NewLeaveRequest { doctor_id: 1, start_date: day(10), end_date: day(8), reason: "Conference".into() };
        let errors = request.validate(day(12)).unwrap_err();
        assert!(errors.get("startDate").is_some());
        assert!(errors.get("endDate").is_some());
        assert!(errors.get("reason").is_none());
    }

    #[test]
    fn inclusive_day_count() {
        let leave: LeaveRequest = serde_json::from_str(
            r#"{"id": 1, "startDate": "2024-07-10", "endDate": "2024-07-12", "status": "APPROVED"}"#,
        )
        .unwrap();
        assert_eq!(leave.days(), 3);
        assert!(leave.covers(day(12)));
        assert!(!leave.covers(day(13)));
    }
}
