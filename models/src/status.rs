// models/src/status.rs

// Wire-level status enums. Every enum carries the literals the backend is known
// to send plus an `Unknown` variant that keeps whatever else arrives, so a renamed
// server enum degrades to showing the raw string instead of failing to decode.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// CSS class used for any status the catalog does not recognise.
pub const FALLBACK_BADGE_CLASS: &str = "bg-secondary";

/// Label + CSS class pair rendered next to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub class: &'static str,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub trait WireStatus {
    fn as_wire(&self) -> &str;
    fn label(&self) -> Cow<'_, str>;
    fn badge_class(&self) -> &'static str;
    fn is_known(&self) -> bool;

    fn badge(&self) -> Badge {
        Badge {
            label: self.label().into_owned(),
            class: self.badge_class(),
        }
    }
}

macro_rules! wire_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $wire:literal, $label:literal, $class:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            Unknown(String),
        }

        impl $name {
            pub const WIRE_VALUES: &'static [&'static str] = &[ $( $wire, )+ ];

            pub fn parse(raw: &str) -> Self {
                match raw.trim().to_ascii_uppercase().as_str() {
                    $( $wire => $name::$variant, )+
                    _ => $name::Unknown(raw.to_string()),
                }
            }
        }

        impl $crate::status::WireStatus for $name {
            fn as_wire(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }

            fn label(&self) -> ::std::borrow::Cow<'_, str> {
                match self {
                    $( $name::$variant => ::std::borrow::Cow::Borrowed($label), )+
                    $name::Unknown(raw) if raw.trim().is_empty() => ::std::borrow::Cow::Borrowed("UNKNOWN"),
                    $name::Unknown(raw) => ::std::borrow::Cow::Borrowed(raw.as_str()),
                }
            }

            fn badge_class(&self) -> &'static str {
                match self {
                    $( $name::$variant => $class, )+
                    $name::Unknown(_) => $crate::status::FALLBACK_BADGE_CLASS,
                }
            }

            fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::parse(s))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str($crate::status::WireStatus::as_wire(self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::status::WireStatus::as_wire(self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::parse(&raw))
            }
        }
    };
}

pub(crate) use wire_status;

wire_status! {
    /// Dispatch state of an emergency call.
    EmergencyStatus {
        Pending => "PENDING", "Pending", "bg-warning";
        NeedsAttention => "NEEDS_ATTENTION", "Needs attention", "bg-danger";
        Assigned => "ASSIGNED", "Assigned", "bg-info";
        EnRoute => "EN_ROUTE", "En route", "bg-primary";
        InTransit => "IN_TRANSIT", "In transit", "bg-primary";
        Arrived => "ARRIVED", "Arrived", "bg-dark";
        Completed => "COMPLETED", "Completed", "bg-success";
        Cancelled => "CANCELLED", "Cancelled", "bg-secondary";
    }
}

wire_status! {
    /// State of a scheduled (non-emergency) ambulance transport.
    BookingStatus {
        Pending => "PENDING", "Pending", "bg-warning";
        Assigned => "ASSIGNED", "Assigned", "bg-info";
        InTransit => "IN_TRANSIT", "In transit", "bg-primary";
        Arrived => "ARRIVED", "Arrived", "bg-dark";
        Completed => "COMPLETED", "Completed", "bg-success";
        Cancelled => "CANCELLED", "Cancelled", "bg-secondary";
    }
}

wire_status! {
    AmbulanceStatus {
        Available => "AVAILABLE", "Available", "bg-success";
        Busy => "BUSY", "Busy", "bg-warning";
        Dispatched => "DISPATCHED", "Dispatched", "bg-primary";
        OnRoute => "ON_ROUTE", "On route", "bg-primary";
        Maintenance => "MAINTENANCE", "Maintenance", "bg-dark";
    }
}

wire_status! {
    Priority {
        Low => "LOW", "Low", "bg-success";
        Medium => "MEDIUM", "Medium", "bg-info";
        High => "HIGH", "High", "bg-warning";
        Critical => "CRITICAL", "Critical", "bg-danger";
    }
}

impl Priority {
    /// Sort weight, higher is more urgent. Unknown priorities sort last.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Unknown(_) => 0,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

wire_status! {
    AppointmentStatus {
        Pending => "PENDING", "Pending", "bg-warning";
        Confirmed => "CONFIRMED", "Confirmed", "bg-primary";
        Completed => "COMPLETED", "Completed", "bg-success";
        Cancelled => "CANCELLED", "Cancelled", "bg-danger";
        NoShow => "NO_SHOW", "No show", "bg-dark";
    }
}

wire_status! {
    SurgeryStatus {
        Pending => "PENDING", "Pending review", "bg-warning";
        Approved => "APPROVED", "Approved", "bg-info";
        Scheduled => "SCHEDULED", "Scheduled", "bg-primary";
        Completed => "COMPLETED", "Completed", "bg-success";
        Rejected => "REJECTED", "Rejected", "bg-danger";
        Cancelled => "CANCELLED", "Cancelled", "bg-dark";
    }
}

wire_status! {
    PharmacyOrderStatus {
        Pending => "PENDING", "Pending", "bg-warning";
        Confirmed => "CONFIRMED", "Confirmed", "bg-info";
        Preparing => "PREPARING", "Preparing", "bg-primary";
        Shipping => "SHIPPING", "Shipping", "bg-primary";
        Delivered => "DELIVERED", "Delivered", "bg-success";
        Cancelled => "CANCELLED", "Cancelled", "bg-danger";
    }
}

wire_status! {
    LeaveStatus {
        Pending => "PENDING", "Pending", "bg-warning";
        Approved => "APPROVED", "Approved", "bg-success";
        Rejected => "REJECTED", "Rejected", "bg-danger";
    }
}

macro_rules! default_pending {
    ($($name:ident),+) => {
        $(
            impl Default for $name {
                fn default() -> Self {
                    $name::Pending
                }
            }
        )+
    };
}

default_pending!(
    EmergencyStatus,
    BookingStatus,
    AppointmentStatus,
    SurgeryStatus,
    PharmacyOrderStatus,
    LeaveStatus
);

impl Default for AmbulanceStatus {
    fn default() -> Self {
        AmbulanceStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_status_falls_back_to_raw_string() {
        let status: EmergencyStatus = "FOO".parse().unwrap();
        assert_eq!(status, EmergencyStatus::Unknown("FOO".to_string()));
        let badge = status.badge();
        assert_eq!(badge.label, "FOO");
        assert_eq!(badge.class, "bg-secondary");
        assert!(!status.is_known());
    }

    #[test]
    fn blank_status_never_renders_blank() {
        let status = BookingStatus::parse("  ");
        assert_eq!(status.label(), "UNKNOWN");
        assert_eq!(status.badge_class(), FALLBACK_BADGE_CLASS);
    }

    #[test]
    fn known_status_maps_label_and_class() {
        let status = EmergencyStatus::parse("needs_attention");
        assert_eq!(status, EmergencyStatus::NeedsAttention);
        assert_eq!(status.label(), "Needs attention");
        assert_eq!(status.badge_class(), "bg-danger");
        assert_eq!(status.as_wire(), "NEEDS_ATTENTION");
    }

    #[test]
    fn unknown_status_survives_serde() {
        let status: AppointmentStatus = serde_json::from_str("\"RESCHEDULED\"").unwrap();
        assert_eq!(status.as_wire(), "RESCHEDULED");
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"RESCHEDULED\"");
    }

    #[test]
    fn priority_rank_orders_critical_first() {
        let mut priorities = vec![Priority::Low, Priority::parse("CRITICAL"), Priority::Unknown("X".into()), Priority::High];
        priorities.sort_by_key(|p| std::cmp::Reverse(p.rank()));
        assert_eq!(priorities[0], Priority::Critical);
        assert_eq!(priorities[3], Priority::Unknown("X".into()));
    }
}
