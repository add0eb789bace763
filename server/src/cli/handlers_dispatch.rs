// server/src/cli/handlers_dispatch.rs

// Emergency and ambulance booking commands: the dispatch side of the portal.

use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use models::{Action, AmbulanceBooking, BookingStatus, Emergency, EmergencyStatus, Priority};
use portal::pages::{BookingListPage, DetailPage, EmergencyListPage, Tracked, TransitionApi};
use portal::{PollingHub, PortalError};
use rest_api::{BookingFilter, EmergencyFilter, RestClient};
use security::{Portal, Session};

use crate::cli::commands::{BookingCommand, EmergencyCommand};
use crate::cli::config::CliContext;
use crate::cli::display::{print_booking, print_bookings, print_emergencies, print_emergency};
use crate::cli::handlers::{confirm, show_notice};

const DISPATCH_PORTALS: [Portal; 2] = [Portal::Driver, Portal::Admin];

pub async fn handle_emergency_command(ctx: &CliContext, command: EmergencyCommand) -> Result<()> {
    let session = ctx.enter(&DISPATCH_PORTALS)?;
    match command {
        EmergencyCommand::List { status, priority, clinic_id, mine } => {
            let mut page = EmergencyListPage::new(EmergencyFilter {
                status: status.as_deref().map(EmergencyStatus::parse),
                priority: priority.as_deref().map(Priority::parse),
                clinic_id,
            });
            let count = if mine {
                page.load_assigned(ctx.client.as_ref(), &session).await?
            } else {
                page.load(ctx.client.as_ref(), &session).await?
            };
            debug!("Loaded {} emergencies", count);
            print_emergencies(page.items());
        }
        EmergencyCommand::Show { id } => {
            let mut page = DetailPage::<Emergency>::new(id);
            print_emergency(page.load(ctx.client.as_ref(), &session).await?);
        }
        EmergencyCommand::Act { id, action, yes } => {
            let mut page = DetailPage::<Emergency>::new(id);
            if perform_confirmed(&mut page, ctx.client.as_ref(), &session, action, yes).await? {
                show_notice(page.notice());
                if let Some(emergency) = page.record() {
                    print_emergency(emergency);
                }
            }
        }
        EmergencyCommand::Watch { id, interval } => {
            let every = interval.map(Duration::from_secs).unwrap_or_else(|| ctx.api.detail_poll_interval());
            watch_emergency(ctx, &session, id, every).await?;
        }
    }
    Ok(())
}

pub async fn handle_booking_command(ctx: &CliContext, command: BookingCommand) -> Result<()> {
    let session = ctx.enter(&DISPATCH_PORTALS)?;
    match command {
        BookingCommand::List { status, clinic_id, patient_id } => {
            let mut page = BookingListPage::new(BookingFilter {
                status: status.as_deref().map(BookingStatus::parse),
                clinic_id,
                patient_id,
            });
            page.load(ctx.client.as_ref(), &session).await?;
            print_bookings(page.items());
        }
        BookingCommand::Show { id } => {
            let mut page = DetailPage::<AmbulanceBooking>::new(id);
            print_booking(page.load(ctx.client.as_ref(), &session).await?);
        }
        BookingCommand::Act { id, action, yes } => {
            let mut page = DetailPage::<AmbulanceBooking>::new(id);
            if perform_confirmed(&mut page, ctx.client.as_ref(), &session, action, yes).await? {
                show_notice(page.notice());
                if let Some(booking) = page.record() {
                    print_booking(booking);
                }
            }
        }
    }
    Ok(())
}

/// Runs `action`, asking on stdin when the action is destructive and `--yes`
/// was not given. `false` when the user declined.
async fn perform_confirmed<E>(
    page: &mut DetailPage<E>,
    client: &RestClient,
    session: &Session,
    action: Action,
    yes: bool,
) -> Result<bool>
where
    E: Tracked,
    RestClient: TransitionApi<E>,
{
    let mut confirmed = yes;
    loop {
        match page.perform(client, session, action, confirmed).await {
            Err(PortalError::ConfirmationRequired { action }) if !confirmed => {
                if !confirm(&format!("{} {} #{}?", action.label(), E::NAME, page.id()))? {
                    println!("Cancelled.");
                    return Ok(false);
                }
                confirmed = true;
            }
            Err(err) => return Err(err.into()),
            Ok(_) => return Ok(true),
        }
    }
}

async fn watch_emergency(ctx: &CliContext, session: &Session, id: i64, every: Duration) -> Result<()> {
    let mut page = DetailPage::<Emergency>::new(id);
    print_emergency(page.load(ctx.client.as_ref(), session).await?);

    let hub = PollingHub::new();
    let mut subscription = page.poll(&hub, Arc::clone(&ctx.client), session, every);
    info!("Watching emergency {} every {:?}", id, every);
    println!("Watching emergency #{}. Press Ctrl-C to stop.", id);

    let mut last_status = page.record().map(|e| e.status.clone());
    loop {
        tokio::select! {
            alive = subscription.changed() => {
                if !alive {
                    break;
                }
                let state = subscription.state();
                page.apply_poll(&state);
                let status = page.record().map(|e| e.status.clone());
                if status != last_status {
                    println!();
                    if let Some(emergency) = page.record() {
                        print_emergency(emergency);
                    }
                    last_status = status;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
