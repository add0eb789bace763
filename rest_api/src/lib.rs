// rest_api/src/lib.rs

// Typed client for the hospital backend's REST API.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod filters;

pub use api::{
    AmbulanceApi, AppointmentApi, AuthApi, BookingApi, ClinicApi, DoctorApi, EmergencyApi,
    LeaveRequestApi, PharmacyApi, ReviewApi, SurgeryApi, UserApi,
};
#[cfg(feature = "mocks")]
pub use api::{
    MockAmbulanceApi, MockAppointmentApi, MockAuthApi, MockBookingApi, MockClinicApi, MockDoctorApi,
    MockEmergencyApi, MockLeaveRequestApi, MockPharmacyApi, MockReviewApi, MockSurgeryApi,
    MockUserApi,
};
pub use client::RestClient;
pub use config::{ApiConfig, load_api_config};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use filters::{
    AmbulanceFilter, AppointmentFilter, BookingFilter, DoctorFilter, EmergencyFilter, LeaveFilter,
    ReviewFilter, SurgeryFilter,
};
