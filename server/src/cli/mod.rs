// server/src/cli/mod.rs

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod handlers;
pub mod handlers_admin;
pub mod handlers_clinic;
pub mod handlers_dispatch;

pub use cli::start_cli;
pub use commands::{CliArgs, Commands};
pub use config::CliContext;
