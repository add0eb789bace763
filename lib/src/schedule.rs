// lib/src/schedule.rs

// Weekly grid for the doctor portal: seven day columns split into fixed
// slots, each appointment placed in the slot holding its start time.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use log::debug;

use models::{Appointment, FieldErrors, ValidationError};

use crate::errors::PortalResult;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub start: NaiveTime,
    pub appointments: Vec<Appointment>,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.appointments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekSchedule {
    pub week_start: NaiveDate,
    pub slot_minutes: u32,
    pub days: Vec<DayColumn>,
    /// Appointments outside the week or outside working hours.
    pub unplaced: Vec<Appointment>,
}

/// Monday of the week containing `day`.
pub fn week_start_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

impl WeekSchedule {
    pub fn build(
        week_start: NaiveDate,
        appointments: &[Appointment],
        slot_minutes: u32,
        day_start: NaiveTime,
        day_end: NaiveTime,
    ) -> PortalResult<Self> {
        let mut errors = FieldErrors::new();
        if slot_minutes == 0 {
            errors.push(ValidationError::OutOfRange { field: "slotMinutes", detail: "must be positive".into() });
        }
        if day_end <= day_start {
            errors.push(ValidationError::Invalid { field: "dayEnd", message: "must be after the start of day".into() });
        }
        errors.into_result(())?;

        let slot = Duration::minutes(i64::from(slot_minutes));
        let working = (day_end - day_start).num_minutes();
        let slot_count = (working + i64::from(slot_minutes) - 1) / i64::from(slot_minutes);

        let days = (0..DAYS_PER_WEEK as i64)
            .map(|offset| DayColumn {
                date: week_start + Duration::days(offset),
                slots: (0..slot_count)
                    .map(|i| Slot { start: day_start + slot * i as i32, appointments: Vec::new() })
                    .collect(),
            })
            .collect();

        let mut schedule = WeekSchedule { week_start, slot_minutes, days, unplaced: Vec::new() };
        let mut sorted = appointments.to_vec();
        sorted.sort_by(|a, b| a.appointment_time.cmp(&b.appointment_time).then(a.id.cmp(&b.id)));

        for appointment in sorted {
            match schedule.position(&appointment, day_start, day_end) {
                Some((day, index)) => schedule.days[day].slots[index].appointments.push(appointment),
                None => schedule.unplaced.push(appointment),
            }
        }
        debug!(
            "Week of {}: {} slots per day, {} unplaced",
            week_start,
            slot_count,
            schedule.unplaced.len()
        );
        Ok(schedule)
    }

    fn position(&self, appointment: &Appointment, day_start: NaiveTime, day_end: NaiveTime) -> Option<(usize, usize)> {
        let when = appointment.appointment_time?;
        let day = (when.date() - self.week_start).num_days();
        if !(0..DAYS_PER_WEEK as i64).contains(&day) {
            return None;
        }
        let time = when.time();
        if time < day_start || time >= day_end {
            return None;
        }
        let index = (time - day_start).num_minutes() / i64::from(self.slot_minutes);
        Some((day as usize, index as usize))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayColumn> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn booked_count(&self) -> usize {
        self.days.iter().flat_map(|d| &d.slots).map(|s| s.appointments.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PortalError;
    use serde_json::json;

    fn at(date: &str, time: &str, id: i64) -> Appointment {
        serde_json::from_value(json!({ "id": id, "appointmentTime": format!("{}T{}", date, time), "status": "CONFIRMED" }))
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn monday_is_the_week_start() {
        assert_eq!(week_start_of(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()), monday());
        assert_eq!(week_start_of(monday()), monday());
        assert_eq!(week_start_of(NaiveDate::from_ymd_opt(2024, 7, 7).unwrap()), monday());
    }

    #[test]
    fn appointments_land_in_their_start_slot() {
        let appointments = vec![
            at("2024-07-01", "08:00:00", 1),
            at("2024-07-01", "08:45:00", 2),
            at("2024-07-03", "16:59:00", 3),
            at("2024-07-03", "17:00:00", 4),
            at("2024-07-08", "09:00:00", 5),
            at("2024-07-02", "07:30:00", 6),
        ];
        let week = WeekSchedule::build(monday(), &appointments, 30, hm(8, 0), hm(17, 0)).unwrap();

        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].slots.len(), 18);
        assert_eq!(week.days[0].slots[0].appointments[0].id, 1);
        assert_eq!(week.days[0].slots[1].start, hm(8, 30));
        assert_eq!(week.days[0].slots[1].appointments[0].id, 2);
        assert_eq!(week.days[2].slots[17].appointments[0].id, 3);
        assert_eq!(week.unplaced.iter().map(|a| a.id).collect::<Vec<_>>(), vec![6, 4, 5]);
        assert_eq!(week.booked_count(), 3);
    }

    #[test]
    fn untimed_appointment_is_unplaced() {
        let untimed: Appointment = serde_json::from_value(json!({ "id": 9, "status": "PENDING" })).unwrap();
        let appointments = vec![at("2024-07-01", "09:00:00", 1), untimed];
        let week = WeekSchedule::build(monday(), &appointments, 30, hm(8, 0), hm(17, 0)).unwrap();
        assert_eq!(week.booked_count(), 1);
        assert_eq!(week.unplaced.iter().map(|a| a.id).collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn partial_last_slot_is_kept() {
        let week = WeekSchedule::build(monday(), &[], 45, hm(8, 0), hm(9, 0)).unwrap();
        assert_eq!(week.days[0].slots.len(), 2);
        assert!(week.days[6].slots.iter().all(Slot::is_free));
    }

    #[test]
    fn bad_bounds_are_rejected() {
        assert!(matches!(
            WeekSchedule::build(monday(), &[], 0, hm(17, 0), hm(8, 0)),
            Err(PortalError::Validation(errors)) if errors.len() == 2
        ));
    }
}
