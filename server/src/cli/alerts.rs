// server/src/cli/alerts.rs

// Terminal front end of the driver's incoming-emergency alert.

use anyhow::Result;
use colored::Colorize;
use log::{debug, info};
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use models::Emergency;
use models::display::{format_timestamp, or_placeholder};
use portal::{AlertMonitor, AlertSink, Chime, Navigation, Notice, PollingHub};
use rest_api::EmergencyApi;
use security::Portal;

use crate::cli::config::CliContext;
use crate::cli::display::{badge, print_emergency, print_notice};

/// Prints the alert as a block on stdout.
pub struct TerminalSink;

impl AlertSink for TerminalSink {
    fn show(&self, emergency: &Emergency) {
        println!();
        println!("{}", "!!! INCOMING EMERGENCY !!!".red().bold());
        println!("{:<10} #{}", "Case", emergency.id);
        println!("{:<10} {}", "Priority", badge(&emergency.priority));
        println!("{:<10} {}", "Status", badge(&emergency.status));
        println!("{:<10} {}", "Patient", emergency.patient_display());
        println!("{:<10} {}", "Address", or_placeholder(emergency.address.as_deref()));
        println!("{:<10} {}", "Reported", format_timestamp(emergency.created_at.as_ref()));
        println!("{}", "[a] accept   [d] dismiss   [q] quit".bold());
    }

    fn hide(&self) {
        println!("{}", "Alert closed.".bright_black());
    }
}

/// Terminal bell when attached to a terminal, a text cue otherwise.
pub struct TerminalBell {
    audible: bool,
}

impl TerminalBell {
    pub fn detect() -> Self {
        TerminalBell { audible: std::io::stdout().is_terminal() }
    }

    fn cue(&self) -> &'static str {
        if self.audible { "\x07" } else { "[chime] new emergency\n" }
    }
}

impl Chime for TerminalBell {
    fn ring(&self) {
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(self.cue().as_bytes()).and_then(|_| out.flush()) {
            debug!("Could not ring the bell: {}", e);
        }
    }
}

pub async fn run_driver_alerts(ctx: &CliContext, interval: Option<u64>) -> Result<()> {
    let session = ctx.enter(&[Portal::Driver])?;
    let every = interval.map(Duration::from_secs).unwrap_or_else(|| ctx.api.alert_poll_interval());
    let monitor = Arc::new(AlertMonitor::new(
        Arc::clone(&ctx.client),
        session.clone(),
        Arc::new(TerminalSink),
        Arc::new(TerminalBell::detect()),
    ));

    let hub = PollingHub::new();
    let subscription = monitor.subscribe(&hub, every);
    let watcher = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move { monitor.watch(subscription).await })
    };
    info!("Watching emergencies for driver {} every {:?}", session.user.email, every);
    println!("Waiting for emergencies. Type a/d/q and press enter.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(input) = line? else { break };
                match input.trim() {
                    "a" | "accept" => {
                        let Some(open) = monitor.visible() else {
                            println!("No alert is open.");
                            continue;
                        };
                        match monitor.accept(open.id).await {
                            Ok(Navigation::EmergencyDetail(id)) => {
                                print_notice(&Notice::success(format!("Emergency #{} accepted", id)));
                                match ctx.client.get_emergency(&session, id).await {
                                    Ok(emergency) => print_emergency(&emergency),
                                    Err(e) => print_notice(&Notice::from_error(&e.into())),
                                }
                            }
                            Err(e) => print_notice(&Notice::from_error(&e)),
                        }
                    }
                    "d" | "dismiss" => monitor.dismiss(),
                    "q" | "quit" => break,
                    "" => {}
                    other => println!("Unknown input '{}'. Use a, d or q.", other),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    watcher.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_falls_back_to_text() {
        assert_eq!(TerminalBell { audible: true }.cue(), "\x07");
        assert!(TerminalBell { audible: false }.cue().contains("new emergency"));
    }
}
