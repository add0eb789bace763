// models/src/medical/mod.rs

pub mod ambulance;
pub mod ambulance_booking;
pub mod appointment;
pub mod clinic;
pub mod doctor;
pub mod emergency;
pub mod leave_request;
pub mod pharmacy_order;
pub mod review;
pub mod role;
pub mod surgery_consultation;
pub mod user;

pub use ambulance::{Ambulance, AmbulanceForm, NewAmbulance};
pub use ambulance_booking::{AmbulanceBooking, NewAmbulanceBooking};
pub use appointment::{Appointment, NewAppointment};
pub use clinic::Clinic;
pub use doctor::Doctor;
pub use emergency::{Emergency, NewEmergency};
pub use leave_request::{LeaveDecision, LeaveRequest, NewLeaveRequest};
pub use pharmacy_order::{DeliveryInfo, NewPharmacyOrder, OrderItem, PaymentMethod, PharmacyOrder, PrescriptionSource};
pub use review::{NewReview, Review};
pub use role::Role;
pub use surgery_consultation::{NewSurgeryConsultation, SurgeryConsultation};
pub use user::{RoleChange, User};
