// models/src/medical/pharmacy_order.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::status::PharmacyOrderStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub medicine_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CashOnDelivery,
    BankTransfer,
    Card,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::CashOnDelivery
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DeliveryInfo {
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = FieldErrors::new();
        errors.require("recipientName", &self.recipient_name);
        let phone = errors.require("phone", &self.phone);
        if !phone.is_empty() && !phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == ' ') {
            errors.push(ValidationError::Invalid { field: "phone", message: "phone may only contain digits".into() });
        }
        errors.require("address", &self.address);
        errors.into_result(())
    }
}

/// Where the medicine list came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum PrescriptionSource {
    /// Uploaded scan, referenced by the stored file name.
    Upload { file_name: String },
    /// Prescription already issued by a doctor in the system.
    Existing { prescription_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyOrder {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub delivery: Option<DeliveryInfo>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub status: PharmacyOrderStatus,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl PharmacyOrder {
    /// Server total when present, otherwise the sum of item subtotals.
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(OrderItem::subtotal).sum())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPharmacyOrder {
    pub prescription: PrescriptionSource,
    pub items: Vec<OrderItem>,
    pub delivery: DeliveryInfo,
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_prefers_server_amount() {
        let mut order = PharmacyOrder {
            id: 1,
            patient_id: None,
            items: vec![
                OrderItem { medicine_name: "Paracetamol".into(), quantity: 2, unit_price: 1.5, dosage: None },
                OrderItem { medicine_name: "Amoxicillin".into(), quantity: 1, unit_price: 4.0, dosage: None },
            ],
            delivery: None,
            payment_method: None,
            status: PharmacyOrderStatus::Pending,
            total_amount: None,
            created_at: None,
        };
        assert_eq!(order.total(), 7.0);
        order.total_amount = Some(6.5);
        assert_eq!(order.total(), 6.5);
    }

    #[test]
    fn delivery_phone_must_be_numeric() {
        let info = DeliveryInfo {
            recipient_name: "Pham D".into(),
            phone: "09x1".into(),
            address: "1 Nguyen Hue".into(),
            note: None,
        };
        assert!(info.validate().unwrap_err().get("phone").is_some());
    }

    #[test]
    fn prescription_source_is_tagged() {
        let json = serde_json::to_value(PrescriptionSource::Existing { prescription_id: 4 }).unwrap();
        assert_eq!(json["kind"], "EXISTING");
    }
}
