// rest_api/src/client.rs

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use models::{
    Ambulance, AmbulanceBooking, Appointment, AppointmentStatus, BookingStatus, Clinic, Doctor,
    Emergency, EmergencyStatus, LeaveDecision, LeaveRequest, NewAmbulance, NewAmbulanceBooking,
    NewAppointment, NewEmergency, NewLeaveRequest, NewPharmacyOrder, NewReview,
    NewSurgeryConsultation, PharmacyOrder, Review, Role, RoleChange, SurgeryConsultation,
    SurgeryStatus, User,
};
use security::Session;

use crate::api::{
    AmbulanceApi, AppointmentApi, AuthApi, BookingApi, ClinicApi, DoctorApi, EmergencyApi,
    LeaveRequestApi, PharmacyApi, ReviewApi, SurgeryApi, UserApi,
};
use crate::config::ApiConfig;
use crate::endpoints::{self, item};
use crate::error::{ApiError, ApiResult};
use crate::filters::{
    AmbulanceFilter, AppointmentFilter, BookingFilter, DoctorFilter, EmergencyFilter, LeaveFilter,
    ReviewFilter, SurgeryFilter,
};

/// Some endpoints wrap their payload in `{ "data": ... }`, others return it
/// bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// reqwest-backed implementation of every resource trait.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    alert_timeout: Duration,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(RestClient {
            http,
            base_url: config.normalized_base_url(),
            alert_timeout: config.alert_request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, session: &Session, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http.request(method, url).bearer_auth(&session.token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            debug!("Request failed with {}", status);
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_inner())
    }

    /// For endpoints whose success body carries nothing the caller needs.
    async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await?;
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl AmbulanceApi for RestClient {
    async fn list_ambulances(&self, session: &Session, filter: &AmbulanceFilter) -> ApiResult<Vec<Ambulance>> {
        self.send(self.request(Method::GET, session, endpoints::AMBULANCES).query(filter)).await
    }

    async fn get_ambulance(&self, session: &Session, id: i64) -> ApiResult<Ambulance> {
        self.send(self.request(Method::GET, session, &item(endpoints::AMBULANCES, id))).await
    }

    async fn create_ambulance(&self, session: &Session, ambulance: &NewAmbulance) -> ApiResult<Ambulance> {
        self.send(self.request(Method::POST, session, endpoints::AMBULANCES).json(ambulance)).await
    }

    async fn update_ambulance(&self, session: &Session, id: i64, ambulance: &NewAmbulance) -> ApiResult<Ambulance> {
        self.send(self.request(Method::PUT, session, &item(endpoints::AMBULANCES, id)).json(ambulance))
            .await
    }

    async fn delete_ambulance(&self, session: &Session, id: i64) -> ApiResult<()> {
        self.send_empty(self.request(Method::DELETE, session, &item(endpoints::AMBULANCES, id))).await
    }
}

#[async_trait]
impl BookingApi for RestClient {
    async fn list_bookings(&self, session: &Session, filter: &BookingFilter) -> ApiResult<Vec<AmbulanceBooking>> {
        self.send(self.request(Method::GET, session, endpoints::BOOKINGS).query(filter)).await
    }

    async fn get_booking(&self, session: &Session, id: i64) -> ApiResult<AmbulanceBooking> {
        self.send(self.request(Method::GET, session, &item(endpoints::BOOKINGS, id))).await
    }

    async fn create_booking(&self, session: &Session, booking: &NewAmbulanceBooking) -> ApiResult<AmbulanceBooking> {
        self.send(self.request(Method::POST, session, endpoints::BOOKINGS).json(booking)).await
    }

    async fn accept_booking(&self, session: &Session, id: i64) -> ApiResult<AmbulanceBooking> {
        self.send(self.request(Method::POST, session, &endpoints::accept(endpoints::BOOKINGS, id))).await
    }

    async fn update_booking_status(
        &self,
        session: &Session,
        id: i64,
        status: BookingStatus,
    ) -> ApiResult<AmbulanceBooking> {
        let path = endpoints::status(endpoints::BOOKINGS, id);
        self.send(self.request(Method::PATCH, session, &path).json(&json!({ "status": status }))).await
    }
}

#[async_trait]
impl EmergencyApi for RestClient {
    async fn list_emergencies(&self, session: &Session, filter: &EmergencyFilter) -> ApiResult<Vec<Emergency>> {
        self.send(self.request(Method::GET, session, endpoints::EMERGENCIES).query(filter)).await
    }

    async fn get_emergency(&self, session: &Session, id: i64) -> ApiResult<Emergency> {
        self.send(self.request(Method::GET, session, &item(endpoints::EMERGENCIES, id))).await
    }

    async fn create_emergency(&self, session: &Session, emergency: &NewEmergency) -> ApiResult<Emergency> {
        self.send(self.request(Method::POST, session, endpoints::EMERGENCIES).json(emergency)).await
    }

    async fn accept_emergency(&self, session: &Session, id: i64) -> ApiResult<Emergency> {
        self.send(self.request(Method::POST, session, &endpoints::accept(endpoints::EMERGENCIES, id))).await
    }

    async fn update_emergency_status(
        &self,
        session: &Session,
        id: i64,
        status: EmergencyStatus,
    ) -> ApiResult<Emergency> {
        let path = endpoints::status(endpoints::EMERGENCIES, id);
        self.send(self.request(Method::PATCH, session, &path).json(&json!({ "status": status }))).await
    }

    async fn my_driver_emergencies(&self, session: &Session) -> ApiResult<Vec<Emergency>> {
        let request = self
            .request(Method::GET, session, endpoints::MY_DRIVER_EMERGENCIES)
            .timeout(self.alert_timeout);
        self.send(request).await
    }
}

#[async_trait]
impl DoctorApi for RestClient {
    async fn list_doctors(&self, session: &Session, filter: &DoctorFilter) -> ApiResult<Vec<Doctor>> {
        self.send(self.request(Method::GET, session, endpoints::DOCTORS).query(filter)).await
    }

    async fn get_doctor(&self, session: &Session, id: i64) -> ApiResult<Doctor> {
        self.send(self.request(Method::GET, session, &item(endpoints::DOCTORS, id))).await
    }
}

#[async_trait]
impl ClinicApi for RestClient {
    async fn list_clinics(&self, session: &Session) -> ApiResult<Vec<Clinic>> {
        self.send(self.request(Method::GET, session, endpoints::CLINICS)).await
    }
}

#[async_trait]
impl UserApi for RestClient {
    async fn list_users(&self, session: &Session) -> ApiResult<Vec<User>> {
        self.send(self.request(Method::GET, session, endpoints::USERS)).await
    }

    async fn update_user_role(&self, session: &Session, user_id: i64, role: Role) -> ApiResult<User> {
        let body = RoleChange { role };
        self.send(self.request(Method::PUT, session, &endpoints::user_role(user_id)).json(&body)).await
    }
}

#[async_trait]
impl AppointmentApi for RestClient {
    async fn list_appointments(&self, session: &Session, filter: &AppointmentFilter) -> ApiResult<Vec<Appointment>> {
        self.send(self.request(Method::GET, session, endpoints::APPOINTMENTS).query(filter)).await
    }

    async fn create_appointment(&self, session: &Session, appointment: &NewAppointment) -> ApiResult<Appointment> {
        self.send(self.request(Method::POST, session, endpoints::APPOINTMENTS).json(appointment)).await
    }

    async fn update_appointment_status(
        &self,
        session: &Session,
        id: i64,
        status: AppointmentStatus,
    ) -> ApiResult<Appointment> {
        let path = endpoints::status(endpoints::APPOINTMENTS, id);
        self.send(self.request(Method::PATCH, session, &path).json(&json!({ "status": status }))).await
    }
}

#[async_trait]
impl LeaveRequestApi for RestClient {
    async fn list_leave_requests(&self, session: &Session, filter: &LeaveFilter) -> ApiResult<Vec<LeaveRequest>> {
        self.send(self.request(Method::GET, session, endpoints::LEAVE_REQUESTS).query(filter)).await
    }

    async fn create_leave_request(&self, session: &Session, request: &NewLeaveRequest) -> ApiResult<LeaveRequest> {
        self.send(self.request(Method::POST, session, endpoints::LEAVE_REQUESTS).json(request)).await
    }

    async fn decide_leave_request(
        &self,
        session: &Session,
        id: i64,
        decision: &LeaveDecision,
    ) -> ApiResult<LeaveRequest> {
        let path = endpoints::status(endpoints::LEAVE_REQUESTS, id);
        self.send(self.request(Method::PATCH, session, &path).json(decision)).await
    }
}

#[async_trait]
impl ReviewApi for RestClient {
    async fn list_reviews(&self, session: &Session, filter: &ReviewFilter) -> ApiResult<Vec<Review>> {
        self.send(self.request(Method::GET, session, endpoints::REVIEWS).query(filter)).await
    }

    async fn create_review(&self, session: &Session, review: &NewReview) -> ApiResult<Review> {
        self.send(self.request(Method::POST, session, endpoints::REVIEWS).json(review)).await
    }

    async fn delete_review(&self, session: &Session, id: i64) -> ApiResult<()> {
        self.send_empty(self.request(Method::DELETE, session, &item(endpoints::REVIEWS, id))).await
    }
}

#[async_trait]
impl PharmacyApi for RestClient {
    async fn list_pharmacy_orders(&self, session: &Session) -> ApiResult<Vec<PharmacyOrder>> {
        self.send(self.request(Method::GET, session, endpoints::PHARMACY_ORDERS)).await
    }

    async fn get_pharmacy_order(&self, session: &Session, id: i64) -> ApiResult<PharmacyOrder> {
        self.send(self.request(Method::GET, session, &item(endpoints::PHARMACY_ORDERS, id))).await
    }

    async fn create_pharmacy_order(&self, session: &Session, order: &NewPharmacyOrder) -> ApiResult<PharmacyOrder> {
        self.send(self.request(Method::POST, session, endpoints::PHARMACY_ORDERS).json(order)).await
    }
}

#[async_trait]
impl SurgeryApi for RestClient {
    async fn list_surgery_consultations(
        &self,
        session: &Session,
        filter: &SurgeryFilter,
    ) -> ApiResult<Vec<SurgeryConsultation>> {
        self.send(self.request(Method::GET, session, endpoints::SURGERY_CONSULTATIONS).query(filter))
            .await
    }

    async fn create_surgery_consultation(
        &self,
        session: &Session,
        consultation: &NewSurgeryConsultation,
    ) -> ApiResult<SurgeryConsultation> {
        self.send(self.request(Method::POST, session, endpoints::SURGERY_CONSULTATIONS).json(consultation))
            .await
    }

    async fn update_surgery_status(
        &self,
        session: &Session,
        id: i64,
        status: SurgeryStatus,
    ) -> ApiResult<SurgeryConsultation> {
        let path = endpoints::status(endpoints::SURGERY_CONSULTATIONS, id);
        self.send(self.request(Method::PATCH, session, &path).json(&json!({ "status": status }))).await
    }
}

#[async_trait]
impl AuthApi for RestClient {
    async fn validate_token(&self, session: &Session) -> ApiResult<User> {
        self.send(self.request(Method::GET, session, endpoints::AUTH_VALIDATE)).await
    }

    async fn logout(&self, session: &Session) -> ApiResult<()> {
        self.send_empty(self.request(Method::POST, session, endpoints::AUTH_LOGOUT)).await
    }
}
