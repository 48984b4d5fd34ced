//! `slots` CLI — generate bookable slots and calendar views from JSON input.
//!
//! ## Usage
//!
//! ```sh
//! # Hour-long slots every 15 minutes (stdin → stdout)
//! echo '{"range":{"begin":"2026-05-01T08:00:00Z","end":"2026-05-01T11:00:00Z"},
//!        "exclusions":[{"begin":"2026-05-01T09:00:00Z","end":"2026-05-01T10:00:00Z"}]}' \
//!   | slots generate --length 60 --interval 15
//!
//! # Only the time labels, allowing the last slots to run past the range
//! slots generate -i request.json --format plain --allow-run-over
//!
//! # Weekly view of several availability windows
//! slots calendar -i availability.json --date 2026-05-01 --view weekly
//!
//! # The month after the one containing --date
//! slots calendar -i availability.json --date 2026-05-01 --view monthly --offset 1
//! ```
//!
//! Set `RUST_LOG` (or pass `--verbose`) to see generation logs on stderr.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use serde_json::Value;
use slot_engine::{
    generate, twelve_hour_label, Calendar, FormatKind, SlotConfig, SlotRequest, TimeRange,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Generate bookable time slots from availability windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate slots for a single range
    Generate {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Slot length in minutes
        #[arg(long, default_value_t = 60, allow_hyphen_values = true)]
        length: i64,
        /// Minutes between successive slot starts
        #[arg(long, default_value_t = 60, allow_hyphen_values = true)]
        interval: i64,
        /// Output shape: full, calendar, or plain
        #[arg(long, default_value = "full")]
        format: String,
        /// Keep slots that start inside the range but end after it
        #[arg(long)]
        allow_run_over: bool,
    },
    /// Bucket the slots of many availability windows into a week or month
    Calendar {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reference date (YYYY-MM-DD); defaults to today in UTC
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Period to show
        #[arg(long, value_enum, default_value_t = View::Weekly)]
        view: View,
        /// Slot length in minutes
        #[arg(long, default_value_t = 60, allow_hyphen_values = true)]
        length: i64,
        /// Minutes between successive slot starts
        #[arg(long, default_value_t = 60, allow_hyphen_values = true)]
        interval: i64,
        /// Periods to move forward (positive) or back (negative) from --date
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Weekly,
    Monthly,
}

/// Input for `slots generate`.
#[derive(Deserialize)]
struct GenerateInput {
    range: TimeRange,
    #[serde(default)]
    exclusions: Vec<TimeRange>,
    #[serde(default = "empty_object")]
    metadata: Value,
}

/// One element of the `slots calendar` input array.
#[derive(Deserialize)]
struct AvailabilityInput {
    range: TimeRange,
    #[serde(default = "empty_object")]
    metadata: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            output,
            length,
            interval,
            format,
            allow_run_over,
        } => {
            let raw = read_input(input.as_deref())?;
            let parsed: GenerateInput =
                serde_json::from_str(&raw).context("Failed to parse generate input JSON")?;

            let request = SlotRequest::new(parsed.range, SlotConfig::new(length, interval))
                .with_exclusions(parsed.exclusions)
                .with_run_over(allow_run_over)
                .with_metadata(parsed.metadata);
            request.validate()?;
            let request = request.with_format(format.parse::<FormatKind>()?);

            let slots = generate(&request, twelve_hour_label)?;
            info!(count = slots.len(), "generated slots");
            write_output(output.as_deref(), &serde_json::to_string_pretty(&slots)?)?;
        }
        Commands::Calendar {
            input,
            output,
            date,
            view,
            length,
            interval,
            offset,
        } => {
            let raw = read_input(input.as_deref())?;
            let windows: Vec<AvailabilityInput> =
                serde_json::from_str(&raw).context("Failed to parse availability JSON")?;

            let anchor = date.unwrap_or_else(|| Utc::now().date_naive());
            let mut calendar = Calendar::new(anchor, SlotConfig::new(length, interval))?;
            for (index, window) in windows.into_iter().enumerate() {
                calendar
                    .add_availability(window.range, window.metadata)
                    .with_context(|| format!("Invalid availability at index {}", index))?;
            }

            let calendar = navigate(calendar, view, offset);
            let result = match view {
                View::Weekly => calendar.weekly()?,
                View::Monthly => calendar.monthly()?,
            };
            info!(
                starts_at = %result.starts_at,
                count = result.slot_count(),
                "built calendar view"
            );
            write_output(output.as_deref(), &serde_json::to_string_pretty(&result)?)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Step the calendar `offset` weeks or months away from its anchor.
fn navigate(mut calendar: Calendar, view: View, offset: i32) -> Calendar {
    for _ in 0..offset.unsigned_abs() {
        calendar = match (view, offset > 0) {
            (View::Weekly, true) => calendar.next_week(),
            (View::Weekly, false) => calendar.previous_week(),
            (View::Monthly, true) => calendar.next_month(),
            (View::Monthly, false) => calendar.previous_month(),
        };
    }
    calendar
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
