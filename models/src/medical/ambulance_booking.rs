// models/src/medical/ambulance_booking.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::BookingStatus;

/// Scheduled, non-emergency patient transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbulanceBooking {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_phone: Option<String>,
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub pickup_latitude: Option<f64>,
    #[serde(default)]
    pub pickup_longitude: Option<f64>,
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub ambulance_id: Option<i64>,
    #[serde(default)]
    pub ambulance_license_plate: Option<String>,
    #[serde(default)]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "crate::timestamp::option")]
    pub scheduled_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub dispatched_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub arrived_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAmbulanceBooking {
    pub patient_name: String,
    pub patient_phone: String,
    pub pickup_address: String,
    pub destination_address: String,
    #[serde(with = "crate::timestamp::required")]
    pub scheduled_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewAmbulanceBooking {
    /// `now` is passed in so a booking in the past can be rejected.
    pub fn validate(&self, now: NaiveDateTime) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.require("patientName", &self.patient_name);
        errors.require("patientPhone", &self.patient_phone);
        errors.require("pickupAddress", &self.pickup_address);
        errors.require("destinationAddress", &self.destination_address);
        if self.scheduled_at < now {
            errors.push(ValidationError::Invalid {
                field: "scheduledAt",
                message: "pickup time is in the past".into(),
            });
        }
        errors.into_result(())
    }
}
