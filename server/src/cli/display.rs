// server/src/cli/display.rs

// Table and badge rendering for the terminal.

use colored::{Color, ColoredString, Colorize};

use models::display::{PLACEHOLDER, format_date, format_timestamp, or_placeholder, truncate};
use models::{
    Action, Ambulance, AmbulanceBooking, Doctor, Emergency, LeaveRequest, Lifecycle, Review, User, WireStatus,
};
use portal::schedule::WeekSchedule;
use portal::{Notice, NoticeLevel};

pub fn badge_color(class: &str) -> Color {
    match class {
        "bg-success" => Color::Green,
        "bg-danger" => Color::Red,
        "bg-warning" => Color::Yellow,
        "bg-info" => Color::Cyan,
        "bg-primary" => Color::Blue,
        "bg-dark" => Color::BrightBlack,
        _ => Color::White,
    }
}

/// Status label coloured after its badge class.
pub fn badge<S: WireStatus + ?Sized>(status: &S) -> ColoredString {
    status.label().into_owned().color(badge_color(status.badge_class()))
}

pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{}", notice.message.green()),
        NoticeLevel::Info => println!("{}", notice.message),
        NoticeLevel::Warning => eprintln!("{}", notice.message.yellow()),
        NoticeLevel::Error => eprintln!("{}", notice.message.red()),
    }
}

pub fn print_actions<S: Lifecycle>(status: &S) {
    let actions = status.allowed_actions();
    if actions.is_empty() {
        println!("No actions available.");
        return;
    }
    let listed: Vec<String> = actions.iter().map(|a: &Action| format!("{} ({})", a.label(), a)).collect();
    println!("Actions: {}", listed.join(", "));
}

fn id_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn print_emergencies(emergencies: &[Emergency]) {
    if emergencies.is_empty() {
        println!("No emergencies.");
        return;
    }
    println!("{:<6} {:<12} {:<16} {:<20} {:<30} {:<16}", "ID", "Priority", "Status", "Patient", "Address", "Created");
    for e in emergencies {
        println!(
            "{:<6} {:<12} {:<16} {:<20} {:<30} {:<16}",
            e.id,
            badge(&e.priority),
            badge(&e.status),
            truncate(&e.patient_display(), 20),
            truncate(&or_placeholder(e.address.as_deref()), 30),
            format_timestamp(e.created_at.as_ref()),
        );
    }
}

pub fn print_emergency(e: &Emergency) {
    println!("{} #{}", "Emergency".bold(), e.id);
    println!("{:<14} {}", "Status", badge(&e.status));
    println!("{:<14} {}", "Priority", badge(&e.priority));
    println!("{:<14} {}", "Patient", e.patient_display());
    println!("{:<14} {}", "Phone", or_placeholder(e.patient_phone.as_deref()));
    println!("{:<14} {}", "Address", or_placeholder(e.address.as_deref()));
    if let (Some(lat), Some(lng)) = (e.latitude, e.longitude) {
        println!("{:<14} {:.5}, {:.5}", "Location", lat, lng);
    }
    println!("{:<14} {}", "Description", or_placeholder(e.description.as_deref()));
    println!("{:<14} {}", "Clinic", or_placeholder(e.clinic_name.as_deref()));
    println!("{:<14} {}", "Ambulance", or_placeholder(e.ambulance_license_plate.as_deref()));
    println!("{:<14} {}", "Created", format_timestamp(e.created_at.as_ref()));
    println!("{:<14} {}", "Dispatched", format_timestamp(e.dispatched_at.as_ref()));
    println!("{:<14} {}", "Arrived", format_timestamp(e.arrived_at.as_ref()));
    println!("{:<14} {}", "Completed", format_timestamp(e.completed_at.as_ref()));
    print_actions(&e.status);
}

pub fn print_bookings(bookings: &[AmbulanceBooking]) {
    if bookings.is_empty() {
        println!("No bookings.");
        return;
    }
    println!("{:<6} {:<16} {:<20} {:<28} {:<28} {:<16}", "ID", "Status", "Patient", "Pickup", "Destination", "Scheduled");
    for b in bookings {
        println!(
            "{:<6} {:<16} {:<20} {:<28} {:<28} {:<16}",
            b.id,
            badge(&b.status),
            truncate(&or_placeholder(b.patient_name.as_deref()), 20),
            truncate(&or_placeholder(b.pickup_address.as_deref()), 28),
            truncate(&or_placeholder(b.destination_address.as_deref()), 28),
            format_timestamp(b.scheduled_at.as_ref()),
        );
    }
}

pub fn print_booking(b: &AmbulanceBooking) {
    println!("{} #{}", "Booking".bold(), b.id);
    println!("{:<14} {}", "Status", badge(&b.status));
    println!("{:<14} {}", "Patient", or_placeholder(b.patient_name.as_deref()));
    println!("{:<14} {}", "Phone", or_placeholder(b.patient_phone.as_deref()));
    println!("{:<14} {}", "Pickup", or_placeholder(b.pickup_address.as_deref()));
    println!("{:<14} {}", "Destination", or_placeholder(b.destination_address.as_deref()));
    println!("{:<14} {}", "Clinic", or_placeholder(b.clinic_name.as_deref()));
    println!("{:<14} {}", "Ambulance", or_placeholder(b.ambulance_license_plate.as_deref()));
    println!("{:<14} {}", "Scheduled", format_timestamp(b.scheduled_at.as_ref()));
    println!("{:<14} {}", "Notes", or_placeholder(b.notes.as_deref()));
    print_actions(&b.status);
}

pub fn print_ambulances(ambulances: &[Ambulance]) {
    if ambulances.is_empty() {
        println!("No ambulances.");
        return;
    }
    println!("{:<6} {:<14} {:<12} {:<14} {:<24} {:<8}", "ID", "Plate", "Type", "Status", "Clinic", "Driver");
    for a in ambulances {
        println!(
            "{:<6} {:<14} {:<12} {:<14} {:<24} {:<8}",
            a.id,
            a.license_plate,
            or_placeholder(a.ambulance_type.as_deref()),
            badge(&a.status),
            truncate(&or_placeholder(a.clinic_name.as_deref()), 24),
            id_text(a.driver_id),
        );
    }
}

pub fn print_users(users: &[User]) {
    println!("{:<6} {:<28} {:<24} {:<16} {:<8}", "ID", "Email", "Name", "Role", "Active");
    for u in users {
        println!(
            "{:<6} {:<28} {:<24} {:<16} {:<8}",
            u.id,
            truncate(&u.email, 28),
            truncate(&or_placeholder(u.full_name.as_deref()), 24),
            badge(&u.role),
            if u.active { "yes" } else { "no" },
        );
    }
}

pub fn print_doctors(doctors: &[&Doctor]) {
    if doctors.is_empty() {
        println!("No doctors match.");
        return;
    }
    println!("{:<6} {:<26} {:<20} {:<26} {:<6}", "ID", "Name", "Specialty", "Clinic", "Years");
    for d in doctors {
        println!(
            "{:<6} {:<26} {:<20} {:<26} {:<6}",
            d.id,
            truncate(&d.display_name(), 26),
            truncate(&or_placeholder(d.specialty.as_deref()), 20),
            truncate(&or_placeholder(d.clinic_name.as_deref()), 26),
            d.experience_years.map(|y| y.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
        );
    }
}

pub fn print_leave_requests(requests: &[LeaveRequest]) {
    if requests.is_empty() {
        println!("No leave requests.");
        return;
    }
    println!("{:<6} {:<22} {:<12} {:<12} {:<5} {:<12} {:<30}", "ID", "Doctor", "From", "To", "Days", "Status", "Reason");
    for r in requests {
        println!(
            "{:<6} {:<22} {:<12} {:<12} {:<5} {:<12} {:<30}",
            r.id,
            truncate(&or_placeholder(r.doctor_name.as_deref()), 22),
            format_date(Some(&r.start_date)),
            format_date(Some(&r.end_date)),
            r.days(),
            badge(&r.status),
            truncate(&or_placeholder(r.reason.as_deref()), 30),
        );
    }
}

pub fn print_reviews(reviews: &[Review], average: Option<f64>) {
    if reviews.is_empty() {
        println!("No reviews yet.");
        return;
    }
    if let Some(avg) = average {
        println!("Average rating: {:.1} ({} reviews)", avg, reviews.len());
    }
    for r in reviews {
        println!(
            "#{:<5} {} {:<20} {:<16} {}",
            r.id,
            r.stars().yellow(),
            truncate(&or_placeholder(r.patient_name.as_deref()), 20),
            format_timestamp(r.created_at.as_ref()),
            truncate(&or_placeholder(r.comment.as_deref()), 60),
        );
    }
}

pub fn print_schedule(week: &WeekSchedule) {
    print!("{:<7}", "");
    for day in &week.days {
        print!("{:<12}", day.date.format("%a %d/%m"));
    }
    println!();
    let rows = week.days.first().map(|d| d.slots.len()).unwrap_or_default();
    for row in 0..rows {
        let start = week.days[0].slots[row].start;
        print!("{:<7}", start.format("%H:%M"));
        for day in &week.days {
            let cell = match day.slots[row].appointments.first() {
                Some(a) => {
                    let text = truncate(&or_placeholder(a.patient_name.as_deref()), 11);
                    format!("{:<12}", text).color(badge_color(a.status.badge_class()))
                }
                None => format!("{:<12}", ".").bright_black(),
            };
            print!("{}", cell);
        }
        println!();
    }
    if !week.unplaced.is_empty() {
        println!("Outside working hours:");
        for a in &week.unplaced {
            println!(
                "  #{} {} {}",
                a.id,
                format_timestamp(a.appointment_time.as_ref()),
                or_placeholder(a.patient_name.as_deref())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::EmergencyStatus;

    #[test]
    fn unknown_status_keeps_its_raw_text() {
        colored::control::set_override(false);
        assert_eq!(badge(&EmergencyStatus::parse("REROUTED")).to_string(), "REROUTED");
        assert_eq!(badge(&EmergencyStatus::EnRoute).to_string(), EmergencyStatus::EnRoute.label());
    }
}
