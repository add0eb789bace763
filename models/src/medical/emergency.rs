// models/src/medical/emergency.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::{EmergencyStatus, Priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emergency {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: EmergencyStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub ambulance_id: Option<i64>,
    #[serde(default)]
    pub ambulance_license_plate: Option<String>,
    #[serde(default)]
    pub driver_id: Option<i64>,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub dispatched_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub arrived_at: Option<NaiveDateTime>,
    #[serde(default, with = "crate::timestamp::option")]
    pub completed_at: Option<NaiveDateTime>,
}

impl Emergency {
    pub fn patient_display(&self) -> String {
        crate::display::or_placeholder(self.patient_name.as_deref())
    }

    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Patient-side emergency call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmergency {
    pub patient_name: String,
    pub patient_phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<i64>,
}

impl NewEmergency {
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.require("patientName", &self.patient_name);
        errors.require("patientPhone", &self.patient_phone);
        errors.require("address", &self.address);
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                errors.push(ValidationError::OutOfRange { field: "latitude", detail: "-90..90".into() });
            }
        }
        if let Some(lng) = self.longitude {
            if !(-180.0..=180.0).contains(&lng) {
                errors.push(ValidationError::OutOfRange { field: "longitude", detail: "-180..180".into() });
            }
        }
        if self.latitude.is_some() != self.longitude.is_some() {
            errors.push(ValidationError::Invalid {
                field: "location",
                message: "latitude and longitude must be given together".into(),
            });
        }
        errors.into_result(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_server_payload() {
        let json = r#"{
            "id": 12,
            "patientName": "Nguyen Van A",
            "status": "EN_ROUTE",
            "priority": "CRITICAL",
            "latitude": 10.77,
            "longitude": 106.70,
            "createdAt": "2024-06-01T08:30:00"
        }"#;
        let emergency: Emergency = serde_json::from_str(json).unwrap();
        assert_eq!(emergency.status, EmergencyStatus::EnRoute);
        assert_eq!(emergency.priority, Priority::Critical);
        assert!(emergency.has_location());
        assert!(emergency.created_at.is_some());
        assert!(emergency.ambulance_id.is_none());
    }

    #[test]
    fn validation_requires_contact_and_paired_coordinates() {
        let call = NewEmergency {
            patient_name: " ".into(),
            patient_phone: "0900".into(),
            address: "12 Le Loi".into(),
            latitude: Some(10.0),
            longitude: None,
            description: None,
            priority: Priority::High,
            clinic_id: None,
        };
        let errors = call.validate().unwrap_err();
        assert!(errors.get("patientName").is_some());
        assert!(errors.get("location").is_some());
        assert!(errors.get("address").is_none());
    }
}
