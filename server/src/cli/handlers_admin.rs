// server/src/cli/handlers_admin.rs

// Admin portal commands: the ambulance fleet and user roles.

use anyhow::Result;

use models::{AmbulanceForm, AmbulanceStatus};
use portal::pages::{AmbulancePage, RoleChangeOutcome, RoleEditor};
use rest_api::AmbulanceFilter;
use security::Portal;

use crate::cli::commands::{AmbulanceCommand, UserCommand};
use crate::cli::config::CliContext;
use crate::cli::display::{print_ambulances, print_users};
use crate::cli::handlers::{confirm, show_notice};

pub async fn handle_ambulance_command(ctx: &CliContext, command: AmbulanceCommand) -> Result<()> {
    let session = ctx.enter(&[Portal::Admin])?;
    match command {
        AmbulanceCommand::List { clinic_id, status } => {
            let mut page = AmbulancePage::new(AmbulanceFilter {
                clinic_id,
                status: status.as_deref().map(AmbulanceStatus::parse),
            });
            page.load(ctx.client.as_ref(), &session).await?;
            print_ambulances(page.list.items());
        }
        AmbulanceCommand::Add { id, license_plate, ambulance_type, clinic_id, status, driver_id } => {
            let form = AmbulanceForm {
                license_plate,
                ambulance_type,
                status,
                clinic_id,
                driver_id: driver_id.unwrap_or_default(),
                ..Default::default()
            };
            let mut page = AmbulancePage::default();
            if let Err(err) = page.save(ctx.client.as_ref(), &session, &form, id).await {
                if let Some(errors) = &page.form_errors {
                    for error in errors.iter() {
                        eprintln!("  - {}", error);
                    }
                }
                return Err(err.into());
            }
            show_notice(page.list.notice());
            print_ambulances(page.list.items());
        }
        AmbulanceCommand::Remove { id, yes } => {
            if !yes && !confirm(&format!("Remove ambulance #{}?", id))? {
                println!("Cancelled.");
                return Ok(());
            }
            let mut page = AmbulancePage::default();
            page.delete(ctx.client.as_ref(), &session, id).await?;
            show_notice(page.list.notice());
        }
    }
    Ok(())
}

pub async fn handle_user_command(ctx: &CliContext, command: UserCommand) -> Result<()> {
    let session = ctx.enter(&[Portal::Admin])?;
    let mut editor = RoleEditor::new();
    editor.load(ctx.client.as_ref(), &session).await?;
    match command {
        UserCommand::List => print_users(editor.users()),
        UserCommand::SetRole { user_id, role } => {
            match editor.change_role(ctx.client.as_ref(), &session, user_id, role).await? {
                RoleChangeOutcome::Unchanged => println!("User #{} already has that role.", user_id),
                RoleChangeOutcome::Updated(_) => {
                    show_notice(editor.list.notice());
                    print_users(editor.users());
                }
            }
        }
    }
    Ok(())
}
