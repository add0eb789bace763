// models/src/lib.rs

pub mod display;
pub mod errors;
pub mod lifecycle;
pub mod medical;
pub mod status;
pub mod timestamp;

pub use errors::{FieldErrors, ValidationError, ValidationResult};
pub use lifecycle::{Action, EntityKind, Lifecycle, Transition};
pub use medical::*;
pub use status::{
    AmbulanceStatus, AppointmentStatus, Badge, BookingStatus, EmergencyStatus, LeaveStatus,
    PharmacyOrderStatus, Priority, SurgeryStatus, WireStatus,
};

/// Record with a server-assigned id.
pub trait Identified {
    fn id(&self) -> i64;
}

macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> i64 {
                    self.id
                }
            }
        )+
    };
}

identified!(
    Ambulance,
    AmbulanceBooking,
    Appointment,
    Clinic,
    Doctor,
    Emergency,
    LeaveRequest,
    PharmacyOrder,
    Review,
    SurgeryConsultation,
    User,
);
