// server/src/cli/cli.rs

// Entry point of hospital-cli: parse arguments, resolve the context, dispatch.

use anyhow::Result;
use clap::Parser;

use crate::cli::alerts::run_driver_alerts;
use crate::cli::commands::{CliArgs, Commands, DriverCommand};
use crate::cli::config::CliContext;
use crate::cli::handlers::{handle_login, handle_logout, handle_whoami, report_error};
use crate::cli::handlers_admin::{handle_ambulance_command, handle_user_command};
use crate::cli::handlers_clinic::{handle_doctor_command, handle_leave_command, handle_review_command};
use crate::cli::handlers_dispatch::{handle_booking_command, handle_emergency_command};

pub async fn start_cli() -> Result<()> {
    dotenv::dotenv().ok();
    let args = CliArgs::parse();
    if let Err(err) = run(args).await {
        report_error(&err);
        std::process::exit(1);
    }
    Ok(())
}

pub async fn run(args: CliArgs) -> Result<()> {
    let ctx = CliContext::from_args(&args)?;
    match args.command {
        Commands::Login { token, offline } => handle_login(&ctx, token, offline).await,
        Commands::Logout => handle_logout(&ctx).await,
        Commands::Whoami => handle_whoami(&ctx),
        Commands::Emergencies(wrapper) => handle_emergency_command(&ctx, wrapper.command).await,
        Commands::Bookings(wrapper) => handle_booking_command(&ctx, wrapper.command).await,
        Commands::Ambulances(wrapper) => handle_ambulance_command(&ctx, wrapper.command).await,
        Commands::Users(wrapper) => handle_user_command(&ctx, wrapper.command).await,
        Commands::Doctors(wrapper) => handle_doctor_command(&ctx, wrapper.command).await,
        Commands::Leave(wrapper) => handle_leave_command(&ctx, wrapper.command).await,
        Commands::Reviews(wrapper) => handle_review_command(&ctx, wrapper.command).await,
        Commands::Driver(wrapper) => match wrapper.command {
            DriverCommand::Alerts { interval } => run_driver_alerts(&ctx, interval).await,
        },
    }
}
