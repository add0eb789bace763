// rest_api/src/api.rs

// One trait per backend resource. Every call takes the caller's session
// explicitly; nothing reads a token from ambient storage.

use async_trait::async_trait;

use models::{
    Ambulance, AmbulanceBooking, Appointment, AppointmentStatus, BookingStatus, Clinic, Doctor,
    Emergency, EmergencyStatus, LeaveDecision, LeaveRequest, NewAmbulance, NewAmbulanceBooking,
    NewAppointment, NewEmergency, NewLeaveRequest, NewPharmacyOrder, NewReview,
    NewSurgeryConsultation, PharmacyOrder, Review, Role, SurgeryConsultation, SurgeryStatus, User,
};
use security::Session;

use crate::error::ApiResult;
use crate::filters::{
    AmbulanceFilter, AppointmentFilter, BookingFilter, DoctorFilter, EmergencyFilter, LeaveFilter,
    ReviewFilter, SurgeryFilter,
};

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait AmbulanceApi: Send + Sync {
    async fn list_ambulances(&self, session: &Session, filter: &AmbulanceFilter) -> ApiResult<Vec<Ambulance>>;
    async fn get_ambulance(&self, session: &Session, id: i64) -> ApiResult<Ambulance>;
    async fn create_ambulance(&self, session: &Session, ambulance: &NewAmbulance) -> ApiResult<Ambulance>;
    async fn update_ambulance(&self, session: &Session, id: i64, ambulance: &NewAmbulance) -> ApiResult<Ambulance>;
    async fn delete_ambulance(&self, session: &Session, id: i64) -> ApiResult<()>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_bookings(&self, session: &Session, filter: &BookingFilter) -> ApiResult<Vec<AmbulanceBooking>>;
    async fn get_booking(&self, session: &Session, id: i64) -> ApiResult<AmbulanceBooking>;
    async fn create_booking(&self, session: &Session, booking: &NewAmbulanceBooking) -> ApiResult<AmbulanceBooking>;
    async fn accept_booking(&self, session: &Session, id: i64) -> ApiResult<AmbulanceBooking>;
    async fn update_booking_status(
        &self,
        session: &Session,
        id: i64,
        status: BookingStatus,
    ) -> ApiResult<AmbulanceBooking>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait EmergencyApi: Send + Sync {
    async fn list_emergencies(&self, session: &Session, filter: &EmergencyFilter) -> ApiResult<Vec<Emergency>>;
    async fn get_emergency(&self, session: &Session, id: i64) -> ApiResult<Emergency>;
    async fn create_emergency(&self, session: &Session, emergency: &NewEmergency) -> ApiResult<Emergency>;
    async fn accept_emergency(&self, session: &Session, id: i64) -> ApiResult<Emergency>;
    async fn update_emergency_status(
        &self,
        session: &Session,
        id: i64,
        status: EmergencyStatus,
    ) -> ApiResult<Emergency>;
    /// Emergencies assigned to, or offered to, the signed-in driver.
    async fn my_driver_emergencies(&self, session: &Session) -> ApiResult<Vec<Emergency>>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait DoctorApi: Send + Sync {
    async fn list_doctors(&self, session: &Session, filter: &DoctorFilter) -> ApiResult<Vec<Doctor>>;
    async fn get_doctor(&self, session: &Session, id: i64) -> ApiResult<Doctor>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ClinicApi: Send + Sync {
    async fn list_clinics(&self, session: &Session) -> ApiResult<Vec<Clinic>>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self, session: &Session) -> ApiResult<Vec<User>>;
    async fn update_user_role(&self, session: &Session, user_id: i64, role: Role) -> ApiResult<User>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait AppointmentApi: Send + Sync {
    async fn list_appointments(&self, session: &Session, filter: &AppointmentFilter) -> ApiResult<Vec<Appointment>>;
    async fn create_appointment(&self, session: &Session, appointment: &NewAppointment) -> ApiResult<Appointment>;
    async fn update_appointment_status(
        &self,
        session: &Session,
        id: i64,
        status: AppointmentStatus,
    ) -> ApiResult<Appointment>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait LeaveRequestApi: Send + Sync {
    async fn list_leave_requests(&self, session: &Session, filter: &LeaveFilter) -> ApiResult<Vec<LeaveRequest>>;
    async fn create_leave_request(&self, session: &Session, request: &NewLeaveRequest) -> ApiResult<LeaveRequest>;
    async fn decide_leave_request(
        &self,
        session: &Session,
        id: i64,
        decision: &LeaveDecision,
    ) -> ApiResult<LeaveRequest>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn list_reviews(&self, session: &Session, filter: &ReviewFilter) -> ApiResult<Vec<Review>>;
    async fn create_review(&self, session: &Session, review: &NewReview) -> ApiResult<Review>;
    async fn delete_review(&self, session: &Session, id: i64) -> ApiResult<()>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait PharmacyApi: Send + Sync {
    async fn list_pharmacy_orders(&self, session: &Session) -> ApiResult<Vec<PharmacyOrder>>;
    async fn get_pharmacy_order(&self, session: &Session, id: i64) -> ApiResult<PharmacyOrder>;
    async fn create_pharmacy_order(&self, session: &Session, order: &NewPharmacyOrder) -> ApiResult<PharmacyOrder>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait SurgeryApi: Send + Sync {
    async fn list_surgery_consultations(
        &self,
        session: &Session,
        filter: &SurgeryFilter,
    ) -> ApiResult<Vec<SurgeryConsultation>>;
    async fn create_surgery_consultation(
        &self,
        session: &Session,
        consultation: &NewSurgeryConsultation,
    ) -> ApiResult<SurgeryConsultation>;
    async fn update_surgery_status(
        &self,
        session: &Session,
        id: i64,
        status: SurgeryStatus,
    ) -> ApiResult<SurgeryConsultation>;
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Asks the server whether the session token is still valid and returns
    /// the account it belongs to.
    async fn validate_token(&self, session: &Session) -> ApiResult<User>;
    async fn logout(&self, session: &Session) -> ApiResult<()>;
}
