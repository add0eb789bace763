// server/src/cli/commands.rs

// Command-line arguments and subcommands for hospital-cli, defined with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use models::{Action, Role};

#[derive(Parser, Debug)]
#[command(name = "hospital-cli")]
#[command(version = "0.1.0")]
#[command(about = "Hospital portal from the terminal")]
pub struct CliArgs {
    /// Backend base URL, overrides HOSPITAL_API_URL and the config file.
    #[clap(long, global = true)]
    pub api_url: Option<String>,
    /// Config file (toml/yaml) with API settings.
    #[clap(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// YAML file overriding the built-in role permissions.
    #[clap(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub roles: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store a bearer token issued by the backend
    Login {
        #[clap(long, env = "HOSPITAL_TOKEN")]
        token: String,
        /// Skip the round trip to /api/auth/validate
        #[clap(long)]
        offline: bool,
    },
    Logout,
    Whoami,
    Emergencies(EmergencyCommandWrapper),
    Bookings(BookingCommandWrapper),
    Ambulances(AmbulanceCommandWrapper),
    Users(UserCommandWrapper),
    Doctors(DoctorCommandWrapper),
    Leave(LeaveCommandWrapper),
    Reviews(ReviewCommandWrapper),
    Driver(DriverCommandWrapper),
}

#[derive(Debug, Args)]
pub struct EmergencyCommandWrapper {
    #[clap(subcommand)]
    pub command: EmergencyCommand,
}

#[derive(Debug, Args)]
pub struct BookingCommandWrapper {
    #[clap(subcommand)]
    pub command: BookingCommand,
}

#[derive(Debug, Args)]
pub struct AmbulanceCommandWrapper {
    #[clap(subcommand)]
    pub command: AmbulanceCommand,
}

#[derive(Debug, Args)]
pub struct UserCommandWrapper {
    #[clap(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Args)]
pub struct DoctorCommandWrapper {
    #[clap(subcommand)]
    pub command: DoctorCommand,
}

#[derive(Debug, Args)]
pub struct LeaveCommandWrapper {
    #[clap(subcommand)]
    pub command: LeaveCommand,
}

#[derive(Debug, Args)]
pub struct ReviewCommandWrapper {
    #[clap(subcommand)]
    pub command: ReviewCommand,
}

#[derive(Debug, Args)]
pub struct DriverCommandWrapper {
    #[clap(subcommand)]
    pub command: DriverCommand,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum EmergencyCommand {
    List {
        #[clap(long)]
        status: Option<String>,
        #[clap(long)]
        priority: Option<String>,
        #[clap(long)]
        clinic_id: Option<i64>,
        /// Only emergencies assigned to me
        #[clap(long)]
        mine: bool,
    },
    Show {
        id: i64,
    },
    /// Run a lifecycle action (accept, en-route, arrived, complete, cancel)
    Act {
        id: i64,
        action: Action,
        #[clap(long, short = 'y')]
        yes: bool,
    },
    /// Follow one emergency, refreshing every few seconds
    Watch {
        id: i64,
        #[clap(long)]
        interval: Option<u64>,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum BookingCommand {
    List {
        #[clap(long)]
        status: Option<String>,
        #[clap(long)]
        clinic_id: Option<i64>,
        #[clap(long)]
        patient_id: Option<i64>,
    },
    Show {
        id: i64,
    },
    /// Run a lifecycle action (accept, start-transit, arrived, complete, cancel)
    Act {
        id: i64,
        action: Action,
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AmbulanceCommand {
    List {
        #[clap(long)]
        clinic_id: Option<i64>,
        #[clap(long)]
        status: Option<String>,
    },
    /// Create an ambulance, or update one with --id
    Add {
        #[clap(long)]
        id: Option<i64>,
        #[clap(long)]
        license_plate: String,
        #[clap(long = "type")]
        ambulance_type: String,
        #[clap(long)]
        clinic_id: String,
        #[clap(long, default_value = "AVAILABLE")]
        status: String,
        #[clap(long)]
        driver_id: Option<String>,
    },
    Remove {
        id: i64,
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum UserCommand {
    List,
    SetRole {
        user_id: i64,
        role: Role,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DoctorCommand {
    List {
        #[clap(long)]
        clinic_id: Option<i64>,
        #[clap(long)]
        specialty: Option<String>,
        /// Filter by name, specialty or clinic
        #[clap(long)]
        search: Option<String>,
    },
    /// Weekly appointment grid for the signed-in doctor
    Schedule {
        /// Any date in the wanted week (YYYY-MM-DD), defaults to today
        #[clap(long)]
        week: Option<String>,
        #[clap(long, default_value_t = 30)]
        slot_minutes: u32,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum LeaveCommand {
    List {
        #[clap(long)]
        status: Option<String>,
    },
    Request {
        #[clap(long)]
        from: String,
        #[clap(long)]
        to: String,
        #[clap(long)]
        reason: String,
    },
    /// Approve or reject a pending request
    Decide {
        id: i64,
        action: Action,
        #[clap(long)]
        note: Option<String>,
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ReviewCommand {
    List {
        #[clap(long)]
        doctor_id: Option<i64>,
    },
    Add {
        #[clap(long)]
        doctor_id: i64,
        #[clap(long)]
        rating: u8,
        #[clap(long)]
        comment: String,
    },
    Remove {
        id: i64,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DriverCommand {
    /// Wait for incoming emergencies and answer them
    Alerts {
        #[clap(long)]
        interval: Option<u64>,
    },
}
