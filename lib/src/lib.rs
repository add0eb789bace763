// lib/src/lib.rs

// Portal core: page state, polling and the driver alert, shared by every
// front end of the hospital portal.

pub mod alert;
pub mod doctor_directory;
pub mod errors;
pub mod notice;
pub mod pages;
pub mod polling;
pub mod schedule;
pub mod wizard;

pub use alert::{ALERT_POLL_KEY, AlertMonitor, AlertSink, AlertTracker, Chime, Navigation};
pub use doctor_directory::DoctorDirectory;
pub use errors::{PortalError, PortalResult};
pub use notice::{Notice, NoticeLevel};
pub use polling::{PollState, PollingHub, Subscription};
pub use schedule::{WeekSchedule, week_start_of};
pub use wizard::{PharmacyStep, PharmacyWizard, SurgeryStep, SurgeryWizard, WizardStep};

// Re-exported so front ends depend on one crate.
pub use models;
pub use rest_api;
pub use security;
