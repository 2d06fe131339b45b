//! `slots` CLI — query and book appointment slots against a JSON store snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Slot labels for a one-hour service on a given day
//! slots available --store store.json --date 2026-03-16 --duration 60
//!
//! # Size the request from a catalog service, hide slots already past
//! slots available --store store.json --date 2026-03-16 --service cut --now 2026-03-16T11:10
//!
//! # Full slot objects as JSON
//! slots available --store store.json --date 2026-03-16 --json
//!
//! # Re-check and book a slot, writing the updated snapshot back
//! slots book --store store.json --start 2026-03-16T10:00 --service cut --id a42 --write
//!
//! # Print and validate the weekly schedule
//! slots schedule --store store.json
//! ```
//!
//! Logs go to stderr. `--log-level` sets the default filter; `RUST_LOG`
//! overrides it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::{
    slot_labels, time, BookingRequest, BookingService, DayOfWeek, InMemoryStore, WorkingHours,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable appointment slots from working hours and existing bookings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Default log filter when RUST_LOG is unset (e.g. "debug", "slot_engine=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List the slots a service can be booked at on one day
    Available {
        /// Store snapshot JSON file
        #[arg(short, long)]
        store: String,
        /// Calendar day, YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        /// Service length in minutes (defaults to 30 when neither this nor --service is given)
        #[arg(long, conflicts_with = "service")]
        duration: Option<i64>,
        /// Take the length from this catalog service
        #[arg(long)]
        service: Option<String>,
        /// Current local time; slots starting at or before it are hidden on that day
        #[arg(long)]
        now: Option<String>,
        /// Print full slot objects as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Re-check a chosen slot against the store and book it
    Book {
        /// Store snapshot JSON file
        #[arg(short, long)]
        store: String,
        /// Local start datetime, e.g. 2026-03-16T10:00
        #[arg(long)]
        start: String,
        /// Service length in minutes (defaults to 30 when neither this nor --service is given)
        #[arg(long, conflicts_with = "service")]
        duration: Option<i64>,
        /// Catalog service being booked
        #[arg(long)]
        service: Option<String>,
        /// Identifier for the new appointment
        #[arg(long)]
        id: Option<String>,
        /// Write the updated snapshot back to the store file
        #[arg(long)]
        write: bool,
    },
    /// Show the effective weekly schedule and report invalid records
    Schedule {
        /// Store snapshot JSON file
        #[arg(short, long)]
        store: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Available {
            store,
            date,
            duration,
            service,
            now,
            json,
        } => {
            let db = load_store(&store)?;
            let booking = BookingService::new(&db, &db, &db);
            let date = time::parse_date(&date).context("Invalid --date")?;
            let duration = resolve_duration(&booking, duration, service.as_deref())?;

            let slots = match now {
                Some(now) => {
                    let now = time::parse_local_datetime(&now).context("Invalid --now")?;
                    booking.available_slots_after(date, duration, now)?
                }
                None => booking.available_slots(date, duration)?,
            };
            tracing::info!(%date, duration, count = slots.len(), "slots computed");

            if json {
                let rows: Vec<serde_json::Value> = slots
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "start": s.start.format("%H:%M").to_string(),
                            "end": s.end.format("%H:%M").to_string(),
                            "label": s.label(),
                            "duration_minutes": s.duration_minutes,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for label in slot_labels(&slots) {
                    println!("{}", label);
                }
            }
        }
        Commands::Book {
            store,
            start,
            duration,
            service,
            id,
            write,
        } => {
            let db = load_store(&store)?;
            let booking = BookingService::new(&db, &db, &db);
            let start = time::parse_local_datetime(&start).context("Invalid --start")?;
            let duration = resolve_duration(&booking, duration, service.as_deref())?;

            let appointment = booking
                .book(BookingRequest {
                    id,
                    start,
                    duration_minutes: duration,
                    service_id: service,
                })
                .with_context(|| format!("Failed to book {}", start))?;

            if write {
                let snapshot = db.snapshot()?.to_json_pretty()?;
                std::fs::write(&store, snapshot)
                    .with_context(|| format!("Failed to write file: {}", store))?;
            }
            println!("{}", serde_json::to_string_pretty(&appointment)?);
        }
        Commands::Schedule { store } => {
            let db = load_store(&store)?;
            let mut invalid = 0;
            for day in DayOfWeek::ALL {
                match db.schedule().get(day) {
                    Some(hours) => {
                        println!("{}: {}", day, describe(hours));
                        if let Err(e) = hours.validate() {
                            invalid += 1;
                            eprintln!("  {}", e);
                        }
                    }
                    None => {
                        println!("{}: default {}", day, describe(&WorkingHours::fallback(day)));
                    }
                }
            }
            if invalid > 0 {
                anyhow::bail!("{} invalid schedule record(s)", invalid);
            }
        }
    }

    Ok(())
}

fn load_store(path: &str) -> Result<InMemoryStore> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))?;
    InMemoryStore::from_json(&json).with_context(|| format!("Failed to load store: {}", path))
}

/// `--duration` wins; otherwise the service's catalog length; otherwise 30.
fn resolve_duration<S, A, C>(
    booking: &BookingService<S, A, C>,
    duration: Option<i64>,
    service: Option<&str>,
) -> Result<i64>
where
    S: slot_engine::ScheduleRepository,
    A: slot_engine::AppointmentRepository,
    C: slot_engine::ServiceCatalog,
{
    match duration {
        Some(minutes) => Ok(slot_engine::resolve_requested_duration(Some(minutes))?),
        None => Ok(booking.requested_duration(service)?),
    }
}

fn describe(hours: &WorkingHours) -> String {
    if !hours.is_working_day {
        return "closed".to_string();
    }
    let mut out = format!(
        "{}-{}",
        hours.start_time.format("%H:%M"),
        hours.end_time.format("%H:%M")
    );
    if let Some((bs, be)) = hours.break_window() {
        out.push_str(&format!(" (break {}-{})", bs.format("%H:%M"), be.format("%H:%M")));
    }
    out
}
