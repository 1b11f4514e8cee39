//! The diff engine: reconciled calendar differences between zoned moments.
//!
//! A single civil subtraction cannot be right about both views of a
//! difference that crosses a DST boundary. Subtracting the two instants
//! after true re-zoning to UTC yields the correct elapsed time (hours,
//! seconds, whole days) but can misreport the calendar break-down, because
//! the offset change shifts the wall-clock hour and may push a date across
//! a day or month line. Subtracting the two instants' wall-clock digits as
//! if both were UTC yields the correct calendar break-down (no offset
//! distortion) but misreports elapsed time whenever the endpoints sit on
//! opposite sides of a DST shift.
//!
//! [`diff`] therefore computes both subtractions and merges them: calendar
//! years/months/days come from the wall-clock view, clock
//! hours/minutes/seconds/micros, direction, and total elapsed days come
//! from the absolute view. The [`DiffRegime::Habitual`] regime skips the
//! absolute view entirely and reports every day as exactly 24 hours,
//! as if no DST shift ever happened.

use chrono::{DateTime, Datelike, Months, NaiveDateTime, Utc};
use serde::Serialize;

use crate::interval::TimeInterval;
use crate::moment::CalendarMoment;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

// ── Regime selection ────────────────────────────────────────────────────────

/// Which view of a DST-crossing difference the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DiffRegime {
    /// True elapsed time: a day spanning a spring-forward shift counts 23
    /// real hours, a fall-back day counts 25.
    #[default]
    Exact,
    /// DST-ignorant wall-clock time: every calendar day counts exactly 24
    /// hours regardless of offset changes.
    Habitual,
}

// ── Calendar components ─────────────────────────────────────────────────────

/// One civil subtraction result: non-negative magnitudes plus direction.
///
/// All magnitude fields are >= 0; `invert` is the sole carrier of sign
/// (true means the subject precedes the baseline). `total_days` is the
/// whole-day count of the raw microsecond distance between the endpoints,
/// independent of the years/months/days break-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarComponents {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub micros: i64,
    pub invert: bool,
    pub total_days: i64,
}

// ── diff ────────────────────────────────────────────────────────────────────

/// Compute the reconciled difference from `baseline` to `subject`.
///
/// Either moment may precede the other, and the two moments may carry
/// different timezones; the result's `invert` flag and signed accessors
/// encode direction.
///
/// # Arguments
///
/// * `baseline` — The reference moment the difference is measured from
/// * `subject` — The moment the difference is measured to
/// * `regime` — [`DiffRegime::Exact`] or [`DiffRegime::Habitual`]
///
/// # Examples
///
/// ```
/// use chronodelta::{diff, CalendarMoment, DiffRegime};
///
/// let a = CalendarMoment::from_civil(2019, 3, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
/// let b = CalendarMoment::from_civil(2019, 4, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
///
/// // The spring-forward shift on 2019-03-31 removes one real hour.
/// assert_eq!(diff(&a, &b, DiffRegime::Exact).total_hours(), 743);
/// assert_eq!(diff(&a, &b, DiffRegime::Habitual).total_hours(), 744);
/// assert_eq!(diff(&a, &b, DiffRegime::Exact).total_months(), 1);
/// ```
pub fn diff(
    baseline: &CalendarMoment,
    subject: &CalendarMoment,
    regime: DiffRegime,
) -> TimeInterval {
    let wall_clock = civil_subtract(baseline.wall_digits_as_utc(), subject.wall_digits_as_utc());
    match regime {
        DiffRegime::Habitual => TimeInterval::from_components(wall_clock, wall_clock),
        DiffRegime::Exact => {
            let absolute = civil_subtract(baseline.utc_instant(), subject.utc_instant());
            TimeInterval::from_components(wall_clock, absolute)
        }
    }
}

// ── Civil subtraction ───────────────────────────────────────────────────────

/// Subtract two UTC instants into calendar components.
///
/// Magnitudes are always computed from the earlier to the later instant, so
/// swapping the arguments flips only `invert`. Whole months are peeled off
/// first by advancing the earlier instant with clamped month addition; the
/// exact remaining microseconds decompose into days and clock fields.
fn civil_subtract(baseline: DateTime<Utc>, subject: DateTime<Utc>) -> CalendarComponents {
    let invert = subject < baseline;
    let (earlier, later) = if invert {
        (subject, baseline)
    } else {
        (baseline, subject)
    };

    let span_micros = later.timestamp_micros() - earlier.timestamp_micros();
    let total_days = span_micros / MICROS_PER_DAY;

    let e = earlier.naive_utc();
    let l = later.naive_utc();

    let mut months_total =
        i64::from(l.year() - e.year()) * 12 + (i64::from(l.month()) - i64::from(e.month()));
    let mut anchor = advance_months(e, months_total);
    if anchor > l {
        months_total -= 1;
        anchor = advance_months(e, months_total);
    }

    let remainder = l.and_utc().timestamp_micros() - anchor.and_utc().timestamp_micros();

    let days = remainder / MICROS_PER_DAY;
    let remainder = remainder % MICROS_PER_DAY;
    let hours = remainder / MICROS_PER_HOUR;
    let remainder = remainder % MICROS_PER_HOUR;
    let minutes = remainder / MICROS_PER_MINUTE;
    let remainder = remainder % MICROS_PER_MINUTE;
    let seconds = remainder / MICROS_PER_SECOND;
    let micros = remainder % MICROS_PER_SECOND;

    CalendarComponents {
        years: months_total / 12,
        months: months_total % 12,
        days,
        hours,
        minutes,
        seconds,
        micros,
        invert,
        total_days,
    }
}

/// Advance a naive datetime by whole months, clamping the day of month.
/// `months` is never negative: the caller only backs an overshoot off by
/// one.
fn advance_months(dt: NaiveDateTime, months: i64) -> NaiveDateTime {
    if months <= 0 {
        return dt;
    }
    dt.date()
        .checked_add_months(Months::new(months as u32))
        .map(|date| date.and_time(dt.time()))
        .unwrap_or(dt)
}

// ── Tests ───────────────────────────────────────────────────────────────────
