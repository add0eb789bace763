// models/src/lifecycle.rs

// One transition table shared by list, detail and alert views. The server owns
// the actual state machine; this table only decides which actions to offer for
// the status the client last fetched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::status::{
    AppointmentStatus, BookingStatus, EmergencyStatus, LeaveStatus, PharmacyOrderStatus,
    SurgeryStatus, WireStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Emergency,
    AmbulanceBooking,
    Appointment,
    SurgeryConsultation,
    PharmacyOrder,
    LeaveRequest,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EntityKind::Emergency => "emergency",
            EntityKind::AmbulanceBooking => "ambulance booking",
            EntityKind::Appointment => "appointment",
            EntityKind::SurgeryConsultation => "surgery consultation",
            EntityKind::PharmacyOrder => "pharmacy order",
            EntityKind::LeaveRequest => "leave request",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Accept,
    MarkEnRoute,
    StartTransit,
    MarkArrived,
    Complete,
    Confirm,
    Prepare,
    Ship,
    Deliver,
    Approve,
    Reject,
    Schedule,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::Accept,
        Action::MarkEnRoute,
        Action::StartTransit,
        Action::MarkArrived,
        Action::Complete,
        Action::Confirm,
        Action::Prepare,
        Action::Ship,
        Action::Deliver,
        Action::Approve,
        Action::Reject,
        Action::Schedule,
        Action::Cancel,
    ];

    /// Command-line spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accept => "accept",
            Action::MarkEnRoute => "en-route",
            Action::StartTransit => "start-transit",
            Action::MarkArrived => "arrived",
            Action::Complete => "complete",
            Action::Confirm => "confirm",
            Action::Prepare => "prepare",
            Action::Ship => "ship",
            Action::Deliver => "deliver",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Schedule => "schedule",
            Action::Cancel => "cancel",
        }
    }

    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Accept => "Accept",
            Action::MarkEnRoute => "Mark en route",
            Action::StartTransit => "Start transport",
            Action::MarkArrived => "Mark arrived",
            Action::Complete => "Complete",
            Action::Confirm => "Confirm",
            Action::Prepare => "Start preparing",
            Action::Ship => "Ship",
            Action::Deliver => "Mark delivered",
            Action::Approve => "Approve",
            Action::Reject => "Reject",
            Action::Schedule => "Schedule",
            Action::Cancel => "Cancel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| ValidationError::Invalid {
                field: "action",
                message: format!("unknown action '{}'", s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub from: &'static [&'static str],
    pub to: &'static str,
    pub requires_confirmation: bool,
}

const fn step(action: Action, from: &'static [&'static str], to: &'static str) -> Transition {
    Transition { action, from, to, requires_confirmation: false }
}

const fn confirmed(action: Action, from: &'static [&'static str], to: &'static str) -> Transition {
    Transition { action, from, to, requires_confirmation: true }
}

const EMERGENCY: &[Transition] = &[
    step(Action::Accept, &["PENDING", "ASSIGNED", "NEEDS_ATTENTION"], "ASSIGNED"),
    step(Action::MarkEnRoute, &["ASSIGNED"], "EN_ROUTE"),
    step(Action::MarkArrived, &["EN_ROUTE", "IN_TRANSIT"], "ARRIVED"),
    confirmed(Action::Complete, &["ARRIVED"], "COMPLETED"),
    confirmed(Action::Cancel, &["PENDING", "NEEDS_ATTENTION", "ASSIGNED"], "CANCELLED"),
];

const AMBULANCE_BOOKING: &[Transition] = &[
    step(Action::Accept, &["PENDING"], "ASSIGNED"),
    step(Action::StartTransit, &["ASSIGNED"], "IN_TRANSIT"),
    step(Action::MarkArrived, &["IN_TRANSIT"], "ARRIVED"),
    confirmed(Action::Complete, &["ARRIVED"], "COMPLETED"),
    confirmed(Action::Cancel, &["PENDING", "ASSIGNED"], "CANCELLED"),
];

const APPOINTMENT: &[Transition] = &[
    step(Action::Confirm, &["PENDING"], "CONFIRMED"),
    step(Action::Complete, &["CONFIRMED"], "COMPLETED"),
    confirmed(Action::Cancel, &["PENDING", "CONFIRMED"], "CANCELLED"),
];

const SURGERY_CONSULTATION: &[Transition] = &[
    step(Action::Approve, &["PENDING"], "APPROVED"),
    confirmed(Action::Reject, &["PENDING"], "REJECTED"),
    step(Action::Schedule, &["APPROVED"], "SCHEDULED"),
    step(Action::Complete, &["SCHEDULED"], "COMPLETED"),
    confirmed(Action::Cancel, &["PENDING", "APPROVED", "SCHEDULED"], "CANCELLED"),
];

const PHARMACY_ORDER: &[Transition] = &[
    step(Action::Confirm, &["PENDING"], "CONFIRMED"),
    step(Action::Prepare, &["CONFIRMED"], "PREPARING"),
    step(Action::Ship, &["PREPARING"], "SHIPPING"),
    step(Action::Deliver, &["SHIPPING"], "DELIVERED"),
    confirmed(Action::Cancel, &["PENDING", "CONFIRMED"], "CANCELLED"),
];

const LEAVE_REQUEST: &[Transition] = &[
    step(Action::Approve, &["PENDING"], "APPROVED"),
    confirmed(Action::Reject, &["PENDING"], "REJECTED"),
];

pub fn transitions(kind: EntityKind) -> &'static [Transition] {
    match kind {
        EntityKind::Emergency => EMERGENCY,
        EntityKind::AmbulanceBooking => AMBULANCE_BOOKING,
        EntityKind::Appointment => APPOINTMENT,
        EntityKind::SurgeryConsultation => SURGERY_CONSULTATION,
        EntityKind::PharmacyOrder => PHARMACY_ORDER,
        EntityKind::LeaveRequest => LEAVE_REQUEST,
    }
}

fn find(kind: EntityKind, action: Action, status: &str) -> Option<&'static Transition> {
    let status = status.trim().to_ascii_uppercase();
    transitions(kind)
        .iter()
        .find(|t| t.action == action && t.from.contains(&status.as_str()))
}

/// Actions offered for `status`, in table order.
pub fn allowed_actions(kind: EntityKind, status: &str) -> Vec<Action> {
    let status = status.trim().to_ascii_uppercase();
    transitions(kind)
        .iter()
        .filter(|t| t.from.contains(&status.as_str()))
        .map(|t| t.action)
        .collect()
}

pub fn can(kind: EntityKind, action: Action, status: &str) -> bool {
    find(kind, action, status).is_some()
}

/// Status the server is expected to report after `action` succeeds.
pub fn target(kind: EntityKind, action: Action, status: &str) -> Option<&'static str> {
    find(kind, action, status).map(|t| t.to)
}

pub fn requires_confirmation(kind: EntityKind, action: Action) -> bool {
    transitions(kind)
        .iter()
        .any(|t| t.action == action && t.requires_confirmation)
}

/// Typed view over the table for a status enum.
pub trait Lifecycle: WireStatus + Sized {
    const KIND: EntityKind;

    fn allowed_actions(&self) -> Vec<Action> {
        allowed_actions(Self::KIND, self.as_wire())
    }

    fn can(&self, action: Action) -> bool {
        can(Self::KIND, action, self.as_wire())
    }

    fn is_terminal(&self) -> bool {
        self.is_known() && self.allowed_actions().is_empty()
    }
}

impl Lifecycle for EmergencyStatus {
    const KIND: EntityKind = EntityKind::Emergency;
}

impl Lifecycle for BookingStatus {
    const KIND: EntityKind = EntityKind::AmbulanceBooking;
}

impl Lifecycle for AppointmentStatus {
    const KIND: EntityKind = EntityKind::Appointment;
}

impl Lifecycle for SurgeryStatus {
    const KIND: EntityKind = EntityKind::SurgeryConsultation;
}

impl Lifecycle for PharmacyOrderStatus {
    const KIND: EntityKind = EntityKind::PharmacyOrder;
}

impl Lifecycle for LeaveStatus {
    const KIND: EntityKind = EntityKind::LeaveRequest;
}

/// Emergency button predicates, keyed purely on the last fetched status.
pub mod emergency {
    use super::{Action, Lifecycle};
    use crate::status::EmergencyStatus;

    pub fn can_accept(status: &EmergencyStatus) -> bool {
        status.can(Action::Accept)
    }

    pub fn can_mark_en_route(status: &EmergencyStatus) -> bool {
        status.can(Action::MarkEnRoute)
    }

    pub fn can_mark_arrived(status: &EmergencyStatus) -> bool {
        status.can(Action::MarkArrived)
    }

    pub fn can_complete(status: &EmergencyStatus) -> bool {
        status.can(Action::Complete)
    }

    /// Statuses that make a new emergency worth interrupting a driver for.
    pub fn is_actionable(status: &EmergencyStatus) -> bool {
        can_accept(status)
    }
}

#[cfg(test)]
mod tests {
    use super::emergency::*;
    use super::*;

    #[test]
    fn can_accept_only_open_emergencies() {
        for wire in EmergencyStatus::WIRE_VALUES {
            let status = EmergencyStatus::parse(wire);
            let expected = matches!(*wire, "PENDING" | "ASSIGNED" | "NEEDS_ATTENTION");
            assert_eq!(can_accept(&status), expected, "status {}", wire);
        }
        assert!(!can_accept(&EmergencyStatus::Unknown("FOO".into())));
    }

    #[test]
    fn emergency_moves_forward_one_step_at_a_time() {
        assert!(can_mark_en_route(&EmergencyStatus::Assigned));
        assert!(!can_mark_en_route(&EmergencyStatus::Pending));
        assert!(can_mark_arrived(&EmergencyStatus::EnRoute));
        assert!(can_mark_arrived(&EmergencyStatus::InTransit));
        assert!(!can_complete(&EmergencyStatus::EnRoute));
        assert!(can_complete(&EmergencyStatus::Arrived));
        assert!(EmergencyStatus::Completed.is_terminal());
        assert!(EmergencyStatus::Cancelled.is_terminal());
    }

    #[test]
    fn unknown_status_is_not_terminal_and_offers_nothing() {
        let status = BookingStatus::parse("ON_HOLD");
        assert!(status.allowed_actions().is_empty());
        assert!(!status.is_terminal());
    }

    #[test]
    fn booking_actions_follow_table_order() {
        assert_eq!(
            BookingStatus::Pending.allowed_actions(),
            vec![Action::Accept, Action::Cancel]
        );
        assert_eq!(
            target(EntityKind::AmbulanceBooking, Action::StartTransit, "assigned"),
            Some("IN_TRANSIT")
        );
        assert_eq!(target(EntityKind::AmbulanceBooking, Action::StartTransit, "PENDING"), None);
    }

    #[test]
    fn destructive_actions_need_confirmation() {
        assert!(requires_confirmation(EntityKind::Emergency, Action::Cancel));
        assert!(requires_confirmation(EntityKind::LeaveRequest, Action::Reject));
        assert!(!requires_confirmation(EntityKind::Emergency, Action::Accept));
    }

    #[test]
    fn action_parses_cli_spelling() {
        assert_eq!("en-route".parse::<Action>().unwrap(), Action::MarkEnRoute);
        assert_eq!("START_TRANSIT".parse::<Action>().unwrap(), Action::StartTransit);
        assert!("fly".parse::<Action>().is_err());
    }
}
