// server/src/cli/handlers.rs

// Session commands (login, logout, whoami) and helpers shared by the other
// handler modules.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use log::{info, warn};
use std::io::{self, BufRead, Write};

use models::display::{format_timestamp, or_placeholder};
use portal::{Notice, PortalError};
use rest_api::AuthApi;
use security::{AuthError, Portal, Session};

use crate::cli::config::CliContext;
use crate::cli::display::{badge, print_notice};

const ALL_PORTALS: [Portal; 4] = [Portal::Admin, Portal::Doctor, Portal::Driver, Portal::Patient];

/// Asks a yes/no question on stdin. Anything but "y"/"yes" is a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prints a page notice left behind by a successful operation.
pub fn show_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        print_notice(notice);
    }
}

/// Top-level error output: portal errors get their user-facing message.
pub fn report_error(err: &anyhow::Error) {
    if let Some(portal_err) = err.downcast_ref::<PortalError>() {
        print_notice(&Notice::from_error(portal_err));
    } else if let Some(auth_err) = err.downcast_ref::<AuthError>() {
        print_notice(&Notice::from_error(&PortalError::Auth(auth_err.clone())));
    } else {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
    }
}

pub async fn handle_login(ctx: &CliContext, token: String, offline: bool) -> Result<()> {
    let mut session = Session::from_token(&token)?;
    session.ensure_fresh(Utc::now())?;
    if !offline {
        let user = ctx.client.validate_token(&session).await.map_err(PortalError::from)?;
        session.user.email = user.email;
        session.user.role = user.role;
        if user.full_name.is_some() {
            session.user.full_name = user.full_name;
        }
    }
    ctx.store.save(&session)?;
    info!("Signed in user {}", session.user.id);
    println!("Signed in as {} ({})", session.user.email.bold(), badge(session.role()));
    Ok(())
}

pub async fn handle_logout(ctx: &CliContext) -> Result<()> {
    match ctx.store.load()? {
        Some(session) => {
            if let Err(e) = ctx.client.logout(&session).await {
                warn!("Server-side logout failed: {}", e);
            }
            ctx.store.clear()?;
            println!("Signed out {}.", session.user.email);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

pub fn handle_whoami(ctx: &CliContext) -> Result<()> {
    let session = ctx.session()?;
    let portals: Vec<String> = ALL_PORTALS
        .iter()
        .filter(|p| ctx.roles.can_enter(session.role(), **p))
        .map(|p| p.to_string())
        .collect();
    let expires = session
        .expires_at
        .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0))
        .map(|at| at.naive_local());

    println!("{:<10} {}", "User", session.user.id);
    println!("{:<10} {}", "Email", session.user.email);
    println!("{:<10} {}", "Name", or_placeholder(session.user.full_name.as_deref()));
    println!("{:<10} {}", "Role", badge(session.role()));
    println!("{:<10} {}", "Portals", if portals.is_empty() { "none".to_string() } else { portals.join(", ") });
    if let Some(doctor_id) = session.user.doctor_id {
        println!("{:<10} {}", "Doctor", doctor_id);
    }
    println!("{:<10} {}", "Expires", format_timestamp(expires.as_ref()));
    println!("{:<10} {}", "Backend", ctx.client.base_url());
    Ok(())
}
