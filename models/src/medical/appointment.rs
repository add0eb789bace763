// models/src/medical/appointment.rs

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::AppointmentStatus;

pub const DEFAULT_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
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
    pub clinic_id: Option<i64>,
    #[serde(default, with = "crate::timestamp::option")]
    pub appointment_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Appointment {
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES)))
    }

    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.appointment_time.map(|start| start + self.duration())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub doctor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(with = "crate::timestamp::required")]
    pub appointment_time: NaiveDateTime,
    pub reason: String,
}

impl NewAppointment {
    pub fn validate(&self, now: NaiveDateTime) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.require("reason", &self.reason);
        if self.appointment_time <= now {
            errors.push(ValidationError::Invalid {
                field: "appointmentTime",
                message: "appointment must be in the future".into(),
            });
        }
        errors.into_result(())
    }
}
