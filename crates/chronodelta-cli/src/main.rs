//! Command-line interface over the chronodelta engine.
//!
//! Every subcommand prints a JSON document to stdout. Moments are given as
//! RFC 3339 strings (with offset or `Z`) or as offset-free civil datetimes
//! (`YYYY-MM-DDTHH:MM:SS`) interpreted in the selected timezone.

use anyhow::Result;
use chronodelta::{
    diff, CalendarMoment, DiffRegime, OverlapKind, SpanDistance, TimeInterval, TimeSpan,
};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "chronodelta",
    version,
    about = "DST-aware calendar diffs and time span overlap classification"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the reconciled difference between two moments
    Diff {
        /// The moment the difference is measured from
        baseline: String,
        /// The moment the difference is measured to
        subject: String,
        /// IANA timezone for both moments (unless overridden per side)
        #[arg(long)]
        timezone: String,
        /// IANA timezone for the subject only
        #[arg(long)]
        subject_timezone: Option<String>,
        /// Report wall-clock time with every day counted as 24 hours
        #[arg(long)]
        habitual: bool,
        /// Additionally render the interval through a format pattern
        /// (e.g. "%y years, %m months, %d days")
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Classify how a span relates to a baseline span
    Overlap {
        base_from: String,
        base_to: String,
        span_from: String,
        span_to: String,
        /// IANA timezone for all four endpoints
        #[arg(long)]
        timezone: String,
    },
    /// Measure the gap between two spans, or report their overlap
    Distance {
        base_from: String,
        base_to: String,
        span_from: String,
        span_to: String,
        /// IANA timezone for all four endpoints
        #[arg(long)]
        timezone: String,
        /// Report wall-clock time with every day counted as 24 hours
        #[arg(long)]
        habitual: bool,
    },
}

#[derive(Serialize)]
struct DiffReport<'a> {
    baseline: &'a CalendarMoment,
    subject: &'a CalendarMoment,
    regime: DiffRegime,
    interval: &'a TimeInterval,
    total_months: i64,
    total_days: i64,
    total_hours: i64,
    total_minutes: i64,
    total_seconds: i64,
    total_micros: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    formatted: Option<String>,
}

#[derive(Serialize)]
struct OverlapReport {
    kind: OverlapKind,
}

#[derive(Serialize)]
struct DistanceReport {
    regime: DiffRegime,
    distance: SpanDistance,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Diff {
            baseline,
            subject,
            timezone,
            subject_timezone,
            habitual,
            pattern,
        } => {
            let baseline = moment(&baseline, &timezone)?;
            let subject = moment(&subject, subject_timezone.as_deref().unwrap_or(&timezone))?;
            let regime = regime_for(habitual);

            let interval = diff(&baseline, &subject, regime);
            let report = DiffReport {
                baseline: &baseline,
                subject: &subject,
                regime,
                total_months: interval.total_months(),
                total_days: interval.total_days(),
                total_hours: interval.total_hours(),
                total_minutes: interval.total_minutes(),
                total_seconds: interval.total_seconds(),
                total_micros: interval.total_micros(),
                formatted: pattern.map(|p| interval.format(&p)),
                interval: &interval,
            };
            print_json(&report)
        }
        Command::Overlap {
            base_from,
            base_to,
            span_from,
            span_to,
            timezone,
        } => {
            let base = span(&base_from, &base_to, &timezone)?;
            let other = span(&span_from, &span_to, &timezone)?;
            let kind = base.overlap(&other)?;
            print_json(&OverlapReport { kind })
        }
        Command::Distance {
            base_from,
            base_to,
            span_from,
            span_to,
            timezone,
            habitual,
        } => {
            let base = span(&base_from, &base_to, &timezone)?;
            let other = span(&span_from, &span_to, &timezone)?;
            let regime = regime_for(habitual);
            let distance = base.distance(&other, regime)?;
            print_json(&DistanceReport { regime, distance })
        }
    }
}

fn regime_for(habitual: bool) -> DiffRegime {
    if habitual {
        DiffRegime::Habitual
    } else {
        DiffRegime::Exact
    }
}

/// Parse a moment as RFC 3339 first, falling back to an offset-free civil
/// datetime in the given zone.
fn moment(input: &str, timezone: &str) -> Result<CalendarMoment> {
    match CalendarMoment::parse(input, timezone) {
        Ok(m) => Ok(m),
        Err(chronodelta::DeltaError::InvalidDatetime(_)) => {
            Ok(CalendarMoment::parse_civil(input, timezone)?)
        }
        Err(e) => Err(e.into()),
    }
}

fn span(from: &str, to: &str, timezone: &str) -> Result<TimeSpan> {
    Ok(TimeSpan::new(moment(from, timezone)?, moment(to, timezone)?)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
