// lib/src/wizard/pharmacy.rs

use log::{info, warn};

use models::{
    DeliveryInfo, FieldErrors, NewPharmacyOrder, OrderItem, PaymentMethod, PharmacyOrder, PharmacyOrderStatus,
    PrescriptionSource, ValidationError, WireStatus,
};
use rest_api::PharmacyApi;
use security::Session;

use crate::errors::{PortalError, PortalResult};
use crate::wizard::WizardStep;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PharmacyStep {
    #[default]
    Upload,
    Medicine,
    Checkout,
    Track,
}

impl WizardStep for PharmacyStep {
    const ALL: &'static [Self] =
        &[PharmacyStep::Upload, PharmacyStep::Medicine, PharmacyStep::Checkout, PharmacyStep::Track];

    fn title(&self) -> &'static str {
        match self {
            PharmacyStep::Upload => "Prescription",
            PharmacyStep::Medicine => "Medicines",
            PharmacyStep::Checkout => "Delivery & payment",
            PharmacyStep::Track => "Order tracking",
        }
    }
}

/// Delivery path shown on the tracking step, in order.
const DELIVERY_PATH: [PharmacyOrderStatus; 5] = [
    PharmacyOrderStatus::Pending,
    PharmacyOrderStatus::Confirmed,
    PharmacyOrderStatus::Preparing,
    PharmacyOrderStatus::Shipping,
    PharmacyOrderStatus::Delivered,
];

#[derive(Debug, Clone, Default)]
pub struct PharmacyWizard {
    step: PharmacyStep,
    pub prescription: Option<PrescriptionSource>,
    pub items: Vec<OrderItem>,
    pub delivery: DeliveryInfo,
    pub payment_method: PaymentMethod,
    order: Option<PharmacyOrder>,
}

impl PharmacyWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> PharmacyStep {
        self.step
    }

    /// The created order; only set once the tracking step is reached.
    pub fn order(&self) -> Option<&PharmacyOrder> {
        self.order.as_ref()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    pub fn add_item(&mut self, item: OrderItem) {
        match self.items.iter_mut().find(|i| i.medicine_name.eq_ignore_ascii_case(&item.medicine_name)) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
    }

    pub fn remove_item(&mut self, index: usize) -> Option<OrderItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    fn check_prescription(&self) -> Result<(), FieldErrors> {
        match &self.prescription {
            None => Err(ValidationError::Required("prescription").into()),
            Some(PrescriptionSource::Upload { file_name }) if file_name.trim().is_empty() => {
                Err(ValidationError::Required("prescription").into())
            }
            Some(PrescriptionSource::Existing { prescription_id }) if *prescription_id <= 0 => {
                Err(ValidationError::Invalid { field: "prescription", message: "unknown prescription".into() }.into())
            }
            Some(_) => Ok(()),
        }
    }

    fn check_items(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.items.is_empty() {
            errors.push(ValidationError::Required("items"));
        }
        for item in &self.items {
            if item.medicine_name.trim().is_empty() {
                errors.push(ValidationError::Required("medicineName"));
            }
            if item.quantity == 0 {
                errors.push(ValidationError::OutOfRange { field: "quantity", detail: "at least 1".into() });
            }
        }
        errors.into_result(())
    }

    /// Validates the current step and moves to the next one. Checkout only
    /// moves on through [`PharmacyWizard::place_order`].
    pub fn next(&mut self) -> PortalResult<PharmacyStep> {
        let next = match self.step() {
            PharmacyStep::Upload => {
                self.check_prescription()?;
                PharmacyStep::Medicine
            }
            PharmacyStep::Medicine => {
                self.check_items()?;
                PharmacyStep::Checkout
            }
            PharmacyStep::Checkout => {
                return Err(PortalError::Wizard("Place the order to continue".into()));
            }
            PharmacyStep::Track => {
                return Err(PortalError::Wizard("The order has already been placed".into()));
            }
        };
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> PortalResult<PharmacyStep> {
        let previous = match self.step() {
            PharmacyStep::Upload => PharmacyStep::Upload,
            PharmacyStep::Medicine => PharmacyStep::Upload,
            PharmacyStep::Checkout => PharmacyStep::Medicine,
            PharmacyStep::Track => {
                return Err(PortalError::Wizard("A placed order cannot be edited".into()));
            }
        };
        self.step = previous;
        Ok(previous)
    }

    /// Sends the order. Tracking is entered only when the server hands back
    /// an order id.
    pub async fn place_order<A>(&mut self, api: &A, session: &Session) -> PortalResult<&PharmacyOrder>
    where
        A: PharmacyApi + ?Sized,
    {
        if self.step() != PharmacyStep::Checkout {
            return Err(PortalError::Wizard(format!("Cannot place an order from the {} step", self.step().title())));
        }
        self.check_prescription()?;
        self.check_items()?;
        self.delivery.validate()?;
        let prescription = self
            .prescription
            .clone()
            .ok_or(PortalError::Validation(ValidationError::Required("prescription").into()))?;

        let request = NewPharmacyOrder {
            prescription,
            items: self.items.clone(),
            delivery: self.delivery.clone(),
            payment_method: self.payment_method,
        };
        let order = api.create_pharmacy_order(session, &request).await?;
        if order.id <= 0 {
            warn!("Pharmacy order created without an id");
            return Err(PortalError::Wizard("The server did not return an order number".into()));
        }
        info!("Pharmacy order {} placed ({} items)", order.id, order.items.len());
        self.step = PharmacyStep::Track;
        Ok(self.order.insert(order))
    }

    /// Refetches the order so tracking reflects the real status.
    pub async fn refresh_order<A>(&mut self, api: &A, session: &Session) -> PortalResult<&PharmacyOrder>
    where
        A: PharmacyApi + ?Sized,
    {
        let id = match &self.order {
            Some(order) => order.id,
            None => return Err(PortalError::Wizard("No order has been placed yet".into())),
        };
        let order = api.get_pharmacy_order(session, id).await?;
        Ok(self.order.insert(order))
    }

    /// Delivery path with each stage marked reached or not, from the last
    /// fetched status. Empty for cancelled or unrecognised statuses.
    pub fn progress(&self) -> Vec<(PharmacyOrderStatus, bool)> {
        let Some(order) = &self.order else {
            return Vec::new();
        };
        match DELIVERY_PATH.iter().position(|s| *s == order.status) {
            Some(reached) => DELIVERY_PATH.iter().enumerate().map(|(i, s)| (s.clone(), i <= reached)).collect(),
            None => {
                if !order.status.is_known() {
                    warn!("Order {} has unrecognised status {}", order.id, order.status.as_wire());
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::{ApiError, MockPharmacyApi};
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({ "token": "t", "user": { "id": 8, "email": "p@b.vn", "role": "PATIENT" } }))
            .unwrap()
    }

    fn item(name: &str, quantity: u32) -> OrderItem {
        OrderItem { medicine_name: name.into(), quantity, unit_price: 12_000.0, dosage: None }
    }

    fn at_checkout() -> PharmacyWizard {
        let mut wizard = PharmacyWizard::new();
        wizard.prescription = Some(PrescriptionSource::Upload { file_name: "rx-0412.jpg".into() });
        wizard.next().unwrap();
        wizard.add_item(item("Paracetamol", 2));
        wizard.next().unwrap();
        wizard.delivery =
            DeliveryInfo { recipient_name: "Lan".into(), phone: "0901234567".into(), address: "12 Le Loi".into(), note: None };
        wizard
    }

    fn order(id: i64, status: &str) -> PharmacyOrder {
        serde_json::from_value(json!({ "id": id, "status": status, "items": [] })).unwrap()
    }

    #[test]
    fn forward_steps_validate_their_own_fields() {
        let mut wizard = PharmacyWizard::new();
        assert!(matches!(wizard.next(), Err(PortalError::Validation(_))));
        wizard.prescription = Some(PrescriptionSource::Existing { prescription_id: 14 });
        assert_eq!(wizard.next().unwrap(), PharmacyStep::Medicine);
        assert!(matches!(wizard.next(), Err(PortalError::Validation(_))));

        wizard.add_item(item("Amoxicillin", 1));
        wizard.add_item(item("amoxicillin", 2));
        assert_eq!(wizard.items.len(), 1);
        assert_eq!(wizard.items[0].quantity, 3);
        assert_eq!(wizard.next().unwrap(), PharmacyStep::Checkout);
        assert!(matches!(wizard.next(), Err(PortalError::Wizard(_))));
        assert_eq!(wizard.back().unwrap(), PharmacyStep::Medicine);
        assert_eq!(wizard.step().index(), 1);
    }

    #[tokio::test]
    async fn tracking_only_after_an_order_id() {
        let mut api = MockPharmacyApi::new();
        let mut calls = 0;
        api.expect_create_pharmacy_order().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 { Err(ApiError::Timeout) } else { Ok(order(31, "PENDING")) }
        });

        let mut wizard = at_checkout();
        assert!(wizard.place_order(&api, &session()).await.is_err());
        assert_eq!(wizard.step(), PharmacyStep::Checkout);
        assert!(wizard.order().is_none());

        let placed = wizard.place_order(&api, &session()).await.unwrap();
        assert_eq!(placed.id, 31);
        assert_eq!(wizard.step(), PharmacyStep::Track);
        assert!(wizard.step().is_last());
        assert!(wizard.back().is_err());
    }

    #[tokio::test]
    async fn missing_id_keeps_checkout() {
        let mut api = MockPharmacyApi::new();
        api.expect_create_pharmacy_order().returning(|_, _| Ok(order(0, "PENDING")));
        let mut wizard = at_checkout();
        assert!(matches!(wizard.place_order(&api, &session()).await, Err(PortalError::Wizard(_))));
        assert_eq!(wizard.step(), PharmacyStep::Checkout);
    }

    #[tokio::test]
    async fn bad_phone_blocks_the_order() {
        let mut api = MockPharmacyApi::new();
        api.expect_create_pharmacy_order().never();
        let mut wizard = at_checkout();
        wizard.delivery.phone = "call me".into();
        assert!(matches!(wizard.place_order(&api, &session()).await, Err(PortalError::Validation(_))));
    }

    #[tokio::test]
    async fn progress_follows_the_refetched_status() {
        let mut api = MockPharmacyApi::new();
        api.expect_create_pharmacy_order().returning(|_, _| Ok(order(5, "PENDING")));
        api.expect_get_pharmacy_order()
            .withf(|_, id| *id == 5)
            .returning(|_, id| Ok(order(id, "SHIPPING")));

        let mut wizard = at_checkout();
        wizard.place_order(&api, &session()).await.unwrap();
        assert_eq!(wizard.progress().iter().filter(|(_, reached)| *reached).count(), 1);

        wizard.refresh_order(&api, &session()).await.unwrap();
        let reached: Vec<_> = wizard.progress().into_iter().filter(|(_, r)| *r).map(|(s, _)| s).collect();
        assert_eq!(reached.last(), Some(&PharmacyOrderStatus::Shipping));
        assert_eq!(reached.len(), 4);
    }
}
