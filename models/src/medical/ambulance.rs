// models/src/medical/ambulance.rs

use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::AmbulanceStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    pub id: i64,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub status: AmbulanceStatus,
    #[serde(default, rename = "type")]
    pub ambulance_type: Option<String>,
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub current_latitude: Option<f64>,
    #[serde(default)]
    pub current_longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAmbulance {
    pub license_plate: String,
    #[serde(rename = "type")]
    pub ambulance_type: String,
    pub status: AmbulanceStatus,
    pub clinic_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_longitude: Option<f64>,
}

/// Raw form inputs, as typed by an admin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbulanceForm {
    pub license_plate: String,
    pub ambulance_type: String,
    pub status: String,
    pub clinic_id: String,
    pub driver_id: String,
    pub latitude: String,
    pub longitude: String,
}

impl AmbulanceForm {
    pub fn from_ambulance(ambulance: &Ambulance) -> Self {
        let text = |v: Option<String>| v.unwrap_or_default();
        AmbulanceForm {
            license_plate: ambulance.license_plate.clone(),
            ambulance_type: text(ambulance.ambulance_type.clone()),
            status: ambulance.status.to_string(),
            clinic_id: text(ambulance.clinic_id.map(|v| v.to_string())),
            driver_id: text(ambulance.driver_id.map(|v| v.to_string())),
            latitude: text(ambulance.current_latitude.map(|v| v.to_string())),
            longitude: text(ambulance.current_longitude.map(|v| v.to_string())),
        }
    }

    pub fn validate(&self) -> ValidationResult<NewAmbulance> {
        let mut errors = FieldErrors::new();
        let license_plate = errors.require("licensePlate", &self.license_plate).to_uppercase();
        let ambulance_type = errors.require("type", &self.ambulance_type).to_string();
        let clinic_id = errors.number::<i64>("clinicId", &self.clinic_id);
        let driver_id = errors.optional_number::<i64>("driverId", &self.driver_id);
        let latitude = errors.optional_number::<f64>("latitude", &self.latitude);
        let longitude = errors.optional_number::<f64>("longitude", &self.longitude);
        if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
            errors.push(ValidationError::OutOfRange { field: "latitude", detail: "-90..90".into() });
        }
        if longitude.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
            errors.push(ValidationError::OutOfRange { field: "longitude", detail: "-180..180".into() });
        }
        let status = if self.status.trim().is_empty() {
            AmbulanceStatus::Available
        } else {
            AmbulanceStatus::parse(&self.status)
        };
        if !crate::status::WireStatus::is_known(&status) {
            errors.push(ValidationError::Invalid {
                field: "status",
                message: format!("unknown ambulance status '{}'", self.status.trim()),
            });
        }

        match clinic_id {
            Some(clinic_id) if errors.is_empty() => Ok(NewAmbulance {
                license_plate,
                ambulance_type,
                status,
                clinic_id,
                driver_id,
                current_latitude: latitude,
                current_longitude: longitude,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_without_plate_still_decodes() {
        let rows: Vec<Ambulance> = serde_json::from_value(json!([
            { "id": 1, "status": "AVAILABLE" },
            { "id": 2, "licensePlate": "51B-123.45" }
        ]))
        .unwrap();
        assert_eq!(rows[0].license_plate, "");
        assert_eq!(rows[1].license_plate, "51B-123.45");
    }

    fn form() -> AmbulanceForm {
        AmbulanceForm {
            license_plate: "51b-123.45".into(),
            ambulance_type: "ADVANCED".into(),
            status: String::new(),
            clinic_id: "4".into(),
            driver_id: String::new(),
            latitude: "10.8".into(),
            longitude: "106.6".into(),
        }
    }

    #[test]
    fn valid_form_builds_payload() {
        let payload = form().validate().unwrap();
        assert_eq!(payload.license_plate, "51B-123.45");
        assert_eq!(payload.status, AmbulanceStatus::Available);
        assert_eq!(payload.clinic_id, 4);
        assert_eq!(payload.driver_id, None);
    }

    #[test]
    fn numeric_fields_are_checked() {
        let mut input = form();
        input.clinic_id = "four".into();
        input.latitude = "95".into();
        input.license_plate = String::new();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("clinicId"), Some(&ValidationError::NotANumber("clinicId")));
        assert!(matches!(errors.get("latitude"), Some(ValidationError::OutOfRange { .. })));
        assert_eq!(errors.get("licensePlate"), Some(&ValidationError::Required("licensePlate")));
    }

    #[test]
    fn form_round_trips_existing_record() {
        let ambulance: Ambulance = serde_json::from_str(
            r#"{"id": 1, "licensePlate": "29A-000.01", "status": "BUSY", "type": "BASIC", "clinicId": 2}"#,
        )
        .unwrap();
        let payload = AmbulanceForm::from_ambulance(&ambulance).validate().unwrap();
        assert_eq!(payload.status, AmbulanceStatus::Busy);
        assert_eq!(payload.ambulance_type, "BASIC");
        assert_eq!(payload.current_latitude, None);
    }
}
