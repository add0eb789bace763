// server/src/cli/handlers_clinic.rs

// Doctor-facing commands: the doctor directory, the weekly schedule, leave
// requests and reviews.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveTime};
use log::debug;

use models::{LeaveStatus, NewReview, Role};
use portal::pages::{AppointmentPage, DoctorListPage, LeaveForm, LeavePage, ReviewPage};
use portal::{DoctorDirectory, PortalError, WeekSchedule, week_start_of};
use rest_api::{AppointmentFilter, DoctorFilter, LeaveFilter, ReviewFilter};
use security::Portal;

use crate::cli::commands::{DoctorCommand, LeaveCommand, ReviewCommand};
use crate::cli::config::CliContext;
use crate::cli::display::{print_doctors, print_leave_requests, print_reviews, print_schedule};
use crate::cli::handlers::{confirm, show_notice};

const WORKDAY_START: (u32, u32) = (8, 0);
const WORKDAY_END: (u32, u32) = (17, 0);

/// Parses a `YYYY-MM-DD` command-line date.
pub fn parse_day(flag: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("--{} must be a date like 2024-03-18, got '{}'", flag, value))
}

fn hour(at: (u32, u32)) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(at.0, at.1, 0).ok_or_else(|| anyhow!("invalid time {:02}:{:02}", at.0, at.1))
}

pub async fn handle_doctor_command(ctx: &CliContext, command: DoctorCommand) -> Result<()> {
    match command {
        DoctorCommand::List { clinic_id, specialty, search } => {
            let session = ctx.session()?;
            let mut page = DoctorListPage::new(DoctorFilter { clinic_id, specialty });
            page.search = search.unwrap_or_default();
            page.load(ctx.client.as_ref(), &session).await?;
            print_doctors(&page.visible());
        }
        DoctorCommand::Schedule { week, slot_minutes } => {
            let session = ctx.enter(&[Portal::Doctor])?;
            let day = match week {
                Some(value) => parse_day("week", &value)?,
                None => Local::now().date_naive(),
            };
            let directory = DoctorDirectory::new();
            let mut page = AppointmentPage::new(AppointmentFilter::default());
            let count = page.load_for_doctor(ctx.client.as_ref(), &directory, &session).await?;
            debug!("Loaded {} appointments", count);
            let grid = WeekSchedule::build(
                week_start_of(day),
                page.list.items(),
                slot_minutes,
                hour(WORKDAY_START)?,
                hour(WORKDAY_END)?,
            )?;
            print_schedule(&grid);
            println!("{} booked this week.", grid.booked_count());
        }
    }
    Ok(())
}

pub async fn handle_leave_command(ctx: &CliContext, command: LeaveCommand) -> Result<()> {
    let directory = DoctorDirectory::new();
    match command {
        LeaveCommand::List { status } => {
            let session = ctx.enter(&[Portal::Doctor, Portal::Admin])?;
            let mut page = LeavePage::new(LeaveFilter {
                doctor_id: None,
                status: status.as_deref().map(LeaveStatus::parse),
            });
            if session.role() == &Role::Doctor {
                page.filter.doctor_id = Some(directory.require_doctor_id(ctx.client.as_ref(), &session).await?);
            }
            page.load(ctx.client.as_ref(), &session).await?;
            print_leave_requests(page.list.items());
        }
        LeaveCommand::Request { from, to, reason } => {
            let session = ctx.enter(&[Portal::Doctor])?;
            let form = LeaveForm {
                start_date: parse_day("from", &from)?,
                end_date: parse_day("to", &to)?,
                reason,
            };
            let mut page = LeavePage::new(LeaveFilter::default());
            let today = Local::now().date_naive();
            page.request(ctx.client.as_ref(), &directory, &session, &form, today).await?;
            show_notice(page.list.notice());
            print_leave_requests(page.list.items());
        }
        LeaveCommand::Decide { id, action, note, yes } => {
            let session = ctx.enter(&[Portal::Admin])?;
            let mut page = LeavePage::new(LeaveFilter::default());
            page.load(ctx.client.as_ref(), &session).await?;
            let mut confirmed = yes;
            loop {
                match page.decide(ctx.client.as_ref(), &session, id, action, note.clone(), confirmed).await {
                    Err(PortalError::ConfirmationRequired { action }) if !confirmed => {
                        if !confirm(&format!("{} leave request #{}?", action.label(), id))? {
                            println!("Cancelled.");
                            return Ok(());
                        }
                        confirmed = true;
                    }
                    other => {
                        other?;
                        break;
                    }
                }
            }
            show_notice(page.list.notice());
        }
    }
    Ok(())
}

pub async fn handle_review_command(ctx: &CliContext, command: ReviewCommand) -> Result<()> {
    match command {
        ReviewCommand::List { doctor_id } => {
            let session = ctx.session()?;
            let mut page = ReviewPage::new(ReviewFilter { doctor_id });
            page.load(ctx.client.as_ref(), &session).await?;
            print_reviews(page.list.items(), page.average_rating());
        }
        ReviewCommand::Add { doctor_id, rating, comment } => {
            let session = ctx.enter(&[Portal::Patient])?;
            let mut page = ReviewPage::new(ReviewFilter { doctor_id: Some(doctor_id) });
            page.submit(ctx.client.as_ref(), &session, NewReview { doctor_id, rating, comment }).await?;
            show_notice(page.list.notice());
            print_reviews(page.list.items(), page.average_rating());
        }
        ReviewCommand::Remove { id } => {
            let session = ctx.enter(&[Portal::Admin])?;
            let mut page = ReviewPage::new(ReviewFilter::default());
            page.delete(ctx.client.as_ref(), &session, id).await?;
            show_notice(page.list.notice());
        }
    }
    Ok(())
}
