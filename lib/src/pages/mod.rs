// lib/src/pages/mod.rs

// View-models for the portal screens. Each page owns its local state and
// loads through an API handle plus an explicit session.

pub mod ambulances;
pub mod appointments;
pub mod bookings;
pub mod detail;
pub mod doctors;
pub mod emergencies;
pub mod leave;
pub mod list;
pub mod reviews;
pub mod surgery;
pub mod users;

pub use ambulances::AmbulancePage;
pub use appointments::{AppointmentPage, book_appointment};
pub use bookings::{BookingListPage, book_ambulance};
pub use detail::{DetailPage, Tracked, TransitionApi, check_action};
pub use doctors::DoctorListPage;
pub use emergencies::{EmergencyListPage, report_emergency, triage_order};
pub use leave::{LeaveForm, LeavePage};
pub use list::ListPage;
pub use reviews::ReviewPage;
pub use surgery::SurgeryPage;
pub use users::{RoleChangeOutcome, RoleEditor};
