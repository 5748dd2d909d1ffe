//! `compani` CLI: date arithmetic in the organization timezone from the shell.
//!
//! ## Usage
//!
//! ```sh
//! # Current instant (UTC, or with the Paris offset)
//! compani now
//! compani now --local
//!
//! # Calendar-aware difference, led by a whole count of the unit
//! compani diff 2021-05-31T00:00:00Z 2021-04-30T00:00:00Z --unit months
//!
//! # Apply an ISO 8601 duration
//! compani add 2021-03-27T10:00:00Z P1D
//! compani subtract 2021-03-28T10:00:00Z PT24H
//!
//! # Public holiday / business day check
//! compani holiday 2021-07-14
//!
//! # strftime rendering in the organization locale
//! compani format 2021-11-24T07:12:08Z "%A %d %B %Y"
//!
//! # Human-readable duration
//! compani duration PT5H16M --long
//!
//! # Step through an interval
//! compani range 2022-02-11T09:00:00Z 2022-02-13T09:00:00Z --step P1D --json
//! ```
//!
//! Set `RUST_LOG=compani_dates=trace` to see every diff and range computation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use compani_dates::{CompaniDate, CompaniDuration, CompaniInterval, DurationFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "compani",
    version,
    about = "Calendar-correct date arithmetic in the Europe/Paris timezone",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current instant
    Now {
        /// Render with the organization offset instead of UTC
        #[arg(long)]
        local: bool,
    },
    /// Elapsed time from FROM to TO as an ISO 8601 duration
    Diff {
        /// Later date (the receiver)
        to: String,
        /// Earlier date
        from: String,
        /// Leading unit (singular or plural)
        #[arg(short, long, default_value = "days")]
        unit: String,
    },
    /// Add an ISO 8601 duration to a date
    Add {
        date: String,
        duration: String,
        /// Render with the organization offset instead of UTC
        #[arg(long)]
        local: bool,
    },
    /// Subtract an ISO 8601 duration from a date
    Subtract {
        date: String,
        duration: String,
        /// Render with the organization offset instead of UTC
        #[arg(long)]
        local: bool,
    },
    /// Report whether a date is a public holiday and a business day
    Holiday { date: String },
    /// Render a date with a strftime pattern in the organization locale
    Format { date: String, pattern: String },
    /// Render an ISO 8601 duration as hours and minutes
    Duration {
        duration: String,
        /// Use the long form (`5h 16min`) instead of the short one (`5h16`)
        #[arg(long)]
        long: bool,
    },
    /// List the start of every STEP-long fragment between START and END
    Range {
        start: String,
        end: String,
        /// ISO 8601 step duration
        #[arg(short, long)]
        step: String,
        /// Drop the last element of the range
        #[arg(long)]
        exclude_end: bool,
        /// Print a JSON array instead of one date per line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Now { local } => {
            println!("{}", render(&CompaniDate::now(), local));
        }
        Commands::Diff { to, from, unit } => {
            let to = parse_date(&to)?;
            let from = parse_date(&from)?;
            let elapsed = to
                .diff(from, &unit)
                .with_context(|| format!("Failed to diff in unit '{}'", unit))?;
            println!("{}", elapsed);
        }
        Commands::Add {
            date,
            duration,
            local,
        } => {
            let moved = parse_date(&date)?
                .add(&duration)
                .with_context(|| format!("Failed to add {} to {}", duration, date))?;
            println!("{}", render(&moved, local));
        }
        Commands::Subtract {
            date,
            duration,
            local,
        } => {
            let moved = parse_date(&date)?
                .subtract(&duration)
                .with_context(|| format!("Failed to subtract {} from {}", duration, date))?;
            println!("{}", render(&moved, local));
        }
        Commands::Holiday { date } => {
            let date = parse_date(&date)?;
            let report = serde_json::json!({
                "date": date,
                "holiday": date.is_holiday(),
                "businessDay": date.is_business_day(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Format { date, pattern } => {
            let rendered = parse_date(&date)?
                .format(&pattern)
                .with_context(|| format!("Failed to format with pattern '{}'", pattern))?;
            println!("{}", rendered);
        }
        Commands::Duration { duration, long } => {
            let parsed = CompaniDuration::new(duration.as_str())
                .with_context(|| format!("Failed to parse duration: {}", duration))?;
            let kind = if long {
                DurationFormat::Long
            } else {
                DurationFormat::Short
            };
            println!("{}", parsed.format(kind));
        }
        Commands::Range {
            start,
            end,
            step,
            exclude_end,
            json,
        } => {
            let interval = CompaniInterval::new((start.as_str(), end.as_str()))
                .with_context(|| format!("Failed to build interval {}/{}", start, end))?;
            let dates = interval
                .range_by(step.as_str(), exclude_end)
                .with_context(|| format!("Failed to step through {} by {}", interval, step))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dates)?);
            } else {
                for date in &dates {
                    println!("{}", date);
                }
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(input: &str) -> Result<CompaniDate> {
    CompaniDate::new(input).with_context(|| format!("Failed to parse date: {}", input))
}

fn render(date: &CompaniDate, local: bool) -> String {
    if local {
        date.to_local_iso()
    } else {
        date.to_iso()
    }
}
