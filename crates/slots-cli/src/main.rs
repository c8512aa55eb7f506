//! `slots` CLI — search bookable time slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Find every slot in a window
//! slots find -c config.json --from 2024-06-03T00:00:00Z --to 2024-06-07T23:59:00Z
//!
//! # Include busy events from a calendar export
//! slots find -c config.json -e events.json --from ... --to ...
//!
//! # Freeze "now" for reproducible lead-time handling
//! slots find -c config.json --from ... --to ... --now 2024-06-01T00:00:00Z
//!
//! # Just the first bookable slot (exit 1 when fully booked)
//! slots next -c config.json --from ... --to ...
//!
//! # Validate a configuration file
//! slots check -c config.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use slots_core::{DateTimePeriod, TimeSlot, TimeSlotsFinderConfiguration};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable time-slot finder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every bookable slot in a search window
    Find {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print only the first bookable slot
    Next {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Validate a configuration file
    Check {
        /// Configuration file (reads from stdin if omitted)
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Configuration file (reads from stdin if omitted)
    #[arg(short, long)]
    config: Option<String>,
    /// Busy calendar events file (JSON array of {startAt, endAt})
    #[arg(short, long)]
    events: Option<String>,
    /// Window start (RFC 3339, or naive datetime taken as UTC)
    #[arg(long)]
    from: String,
    /// Window end
    #[arg(long)]
    to: String,
    /// Reference time for lead-time limits (defaults to the current time)
    #[arg(long)]
    now: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Find { search } => {
            let slots = run_search(&search)?;
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        Commands::Next { search } => {
            let slots = run_search(&search)?;
            match slots.first() {
                Some(slot) => println!("{}", serde_json::to_string_pretty(slot)?),
                None => {
                    eprintln!("No available time slot in the search window");
                    process::exit(1);
                }
            }
        }
        Commands::Check { config } => {
            let configuration = read_configuration(config.as_deref())?;
            configuration
                .validate()
                .context("Configuration is invalid")?;
            println!("Configuration OK");
        }
    }

    Ok(())
}

fn run_search(args: &SearchArgs) -> Result<Vec<TimeSlot>> {
    let configuration = read_configuration(args.config.as_deref())?;
    let events = match args.events.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read events file: {}", path))?;
            serde_json::from_str::<Vec<DateTimePeriod>>(&raw)
                .with_context(|| format!("Invalid events JSON in {}", path))?
        }
        None => Vec::new(),
    };
    let from = parse_datetime(&args.from).context("Invalid --from")?;
    let to = parse_datetime(&args.to).context("Invalid --to")?;
    let now = match args.now.as_deref() {
        Some(raw) => parse_datetime(raw).context("Invalid --now")?,
        None => Utc::now(),
    };

    slots_core::find_available_time_slots_at(&events, &configuration, from, to, now)
        .context("Slot search failed")
}

fn read_configuration(path: Option<&str>) -> Result<TimeSlotsFinderConfiguration> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Invalid configuration JSON")
}

/// Parse RFC 3339, falling back to a naive datetime interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| anyhow::anyhow!("Invalid datetime '{}': {}", s, e))
}
