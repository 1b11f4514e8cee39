//! The immutable carrier of a reconciled diff result.
//!
//! A [`TimeInterval`] is created only by [`crate::diff`] or by
//! [`crate::TimeSpan::distance`] and never changes afterwards: every field
//! is private and no mutating method exists. The raw state keeps the
//! wall-clock calendar fields and the absolute clock fields side by side;
//! the signed `relative_*` and `total_*` accessors derive from them, with
//! the `invert` flag as the single carrier of direction.

use serde::Serialize;

use crate::diff::CalendarComponents;

/// The reconciled calendar and absolute-time break-down of a difference.
///
/// The arithmetic identities between the derived accessors hold for every
/// instance:
///
/// - `total_months() == total_years() * 12 + relative_months()`
/// - `total_hours() == total_days() * 24 + relative_hours()`
/// - `total_minutes() == total_hours() * 60 + relative_minutes()`
/// - `total_seconds() == total_minutes() * 60 + relative_seconds()`
/// - `total_micros() == total_seconds() * 1_000_000 + relative_micros()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    years: i64,
    months: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    micros: i64,
    invert: bool,
    total_days_unsigned: i64,
    iso_duration: String,
}

impl TimeInterval {
    /// Merge the two civil subtractions into one interval.
    ///
    /// Calendar years/months/days come from `wall_clock`; clock fields,
    /// direction, and the elapsed-day total come from `absolute`. The
    /// habitual regime passes the wall-clock components on both sides.
    pub(crate) fn from_components(
        wall_clock: CalendarComponents,
        absolute: CalendarComponents,
    ) -> TimeInterval {
        let iso_duration = format!(
            "P{}Y{}M{}DT{}H{}M{}S",
            wall_clock.years,
            wall_clock.months,
            wall_clock.days,
            absolute.hours,
            absolute.minutes,
            absolute.seconds
        );
        TimeInterval {
            years: wall_clock.years,
            months: wall_clock.months,
            days: wall_clock.days,
            hours: absolute.hours,
            minutes: absolute.minutes,
            seconds: absolute.seconds,
            micros: absolute.micros,
            invert: absolute.invert,
            total_days_unsigned: absolute.total_days,
            iso_duration,
        }
    }

    // ── Raw unsigned view ───────────────────────────────────────────────

    /// Calendar years magnitude (wall-clock view).
    pub fn years(&self) -> i64 {
        self.years
    }

    /// Calendar months magnitude, 0-11 (wall-clock view).
    pub fn months(&self) -> i64 {
        self.months
    }

    /// Calendar days magnitude (wall-clock view).
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Clock hours magnitude, 0-23 (absolute view).
    pub fn hours(&self) -> i64 {
        self.hours
    }

    /// Clock minutes magnitude, 0-59 (absolute view).
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Clock seconds magnitude, 0-59 (absolute view).
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Clock microseconds magnitude, 0-999999 (absolute view).
    pub fn micros(&self) -> i64 {
        self.micros
    }

    /// True when the subject precedes the baseline.
    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Whole elapsed days between the endpoints, always non-negative.
    pub fn total_days_unsigned(&self) -> i64 {
        self.total_days_unsigned
    }

    /// ISO-8601 duration string, unsigned, every component always emitted
    /// (e.g. `P0Y1M0DT23H0M0S`). Deliberately non-minimal.
    pub fn iso_duration(&self) -> &str {
        &self.iso_duration
    }

    // ── Signed relative view ────────────────────────────────────────────

    fn sign(&self) -> i64 {
        if self.invert {
            -1
        } else {
            1
        }
    }

    pub fn relative_years(&self) -> i64 {
        self.sign() * self.years
    }

    pub fn relative_months(&self) -> i64 {
        self.sign() * self.months
    }

    pub fn relative_days(&self) -> i64 {
        self.sign() * self.days
    }

    pub fn relative_hours(&self) -> i64 {
        self.sign() * self.hours
    }

    pub fn relative_minutes(&self) -> i64 {
        self.sign() * self.minutes
    }

    pub fn relative_seconds(&self) -> i64 {
        self.sign() * self.seconds
    }

    pub fn relative_micros(&self) -> i64 {
        self.sign() * self.micros
    }

    // ── Signed totals ───────────────────────────────────────────────────

    pub fn total_years(&self) -> i64 {
        self.relative_years()
    }

    pub fn total_months(&self) -> i64 {
        self.total_years() * 12 + self.relative_months()
    }

    pub fn total_days(&self) -> i64 {
        self.sign() * self.total_days_unsigned
    }

    pub fn total_hours(&self) -> i64 {
        self.total_days() * 24 + self.relative_hours()
    }

    pub fn total_minutes(&self) -> i64 {
        self.total_hours() * 60 + self.relative_minutes()
    }

    pub fn total_seconds(&self) -> i64 {
        self.total_minutes() * 60 + self.relative_seconds()
    }

    pub fn total_micros(&self) -> i64 {
        self.total_seconds() * 1_000_000 + self.relative_micros()
    }

    // ── Interop ─────────────────────────────────────────────────────────

    /// The conventional unsigned-fields-plus-invert interval shape, for
    /// interop with calendar code that expects a native diff result.
    pub fn to_raw_interval(&self) -> CalendarComponents {
        CalendarComponents {
            years: self.years,
            months: self.months,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            micros: self.micros,
            invert: self.invert,
            total_days: self.total_days_unsigned,
        }
    }

    // ── Formatting ──────────────────────────────────────────────────────

    /// Substitute interval fields into a pattern string.
    ///
    /// Tokens: `%y %m %d %h %i %s %f` insert the unsigned magnitudes
    /// unpadded; `%Y %M %D %H %I %S` zero-pad to two digits and `%F` to
    /// six; `%a` inserts the whole elapsed days; `%R` inserts `+` or `-`,
    /// `%r` inserts `-` only for inverted intervals; `%%` is a literal
    /// percent sign. Any other escaped character passes through unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronodelta::{diff, CalendarMoment, DiffRegime};
    ///
    /// let a = CalendarMoment::from_civil(2019, 2, 1, 0, 0, 0, 0, "UTC").unwrap();
    /// let b = CalendarMoment::from_civil(2019, 3, 1, 6, 30, 0, 0, "UTC").unwrap();
    /// let interval = diff(&a, &b, DiffRegime::Exact);
    ///
    /// assert_eq!(interval.format("%m month(s), %d day(s), %H:%I"), "1 month(s), 0 day(s), 06:30");
    /// assert_eq!(interval.format("%a days total"), "28 days total");
    /// ```
    pub fn format(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len());
        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some('y') => out.push_str(&self.years.to_string()),
                Some('Y') => out.push_str(&format!("{:02}", self.years)),
                Some('m') => out.push_str(&self.months.to_string()),
                Some('M') => out.push_str(&format!("{:02}", self.months)),
                Some('d') => out.push_str(&self.days.to_string()),
                Some('D') => out.push_str(&format!("{:02}", self.days)),
                Some('h') => out.push_str(&self.hours.to_string()),
                Some('H') => out.push_str(&format!("{:02}", self.hours)),
                Some('i') => out.push_str(&self.minutes.to_string()),
                Some('I') => out.push_str(&format!("{:02}", self.minutes)),
                Some('s') => out.push_str(&self.seconds.to_string()),
                Some('S') => out.push_str(&format!("{:02}", self.seconds)),
                Some('f') => out.push_str(&self.micros.to_string()),
                Some('F') => out.push_str(&format!("{:06}", self.micros)),
                Some('a') => out.push_str(&self.total_days_unsigned.to_string()),
                Some('R') => out.push(if self.invert { '-' } else { '+' }),
                Some('r') => {
                    if self.invert {
                        out.push('-');
                    }
                }
                Some('%') => out.push('%'),
                Some(other) => out.push(other),
                None => out.push('%'),
            }
        }
        out
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff, DiffRegime};
    use crate::moment::CalendarMoment;

    fn sample_interval() -> TimeInterval {
        let a = CalendarMoment::from_civil(2019, 3, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
        let b = CalendarMoment::from_civil(2019, 4, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
        diff(&a, &b, DiffRegime::Exact)
    }

    fn inverted_interval() -> TimeInterval {
        let a = CalendarMoment::from_civil(2019, 4, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
        let b = CalendarMoment::from_civil(2019, 3, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
        diff(&a, &b, DiffRegime::Exact)
    }

    // ── Derived field identities ────────────────────────────────────────

    #[test]
    fn test_total_decomposition_identities() {
        for interval in [sample_interval(), inverted_interval()] {
            assert_eq!(interval.total_years(), interval.relative_years());
            assert_eq!(
                interval.total_months(),
                interval.total_years() * 12 + interval.relative_months()
            );
            assert_eq!(
                interval.total_hours(),
                interval.total_days() * 24 + interval.relative_hours()
            );
            assert_eq!(
                interval.total_minutes(),
                interval.total_hours() * 60 + interval.relative_minutes()
            );
            assert_eq!(
                interval.total_seconds(),
                interval.total_minutes() * 60 + interval.relative_seconds()
            );
            assert_eq!(
                interval.total_micros(),
                interval.total_seconds() * 1_000_000 + interval.relative_micros()
            );
        }
    }

    #[test]
    fn test_raw_fields_never_negative() {
        let interval = inverted_interval();
        assert!(interval.invert());
        assert!(interval.years() >= 0);
        assert!(interval.months() >= 0);
        assert!(interval.days() >= 0);
        assert!(interval.hours() >= 0);
        assert!(interval.minutes() >= 0);
        assert!(interval.seconds() >= 0);
        assert!(interval.micros() >= 0);
        assert!(interval.total_days_unsigned() >= 0);
    }

    #[test]
    fn test_signed_views_carry_direction() {
        let interval = inverted_interval();
        assert_eq!(interval.relative_months(), -1);
        assert_eq!(interval.total_days(), -30);
        assert_eq!(interval.total_hours(), -743);
    }

    // ── ISO duration ────────────────────────────────────────────────────

    #[test]
    fn test_iso_duration_emits_every_component() {
        let a = CalendarMoment::from_civil(2019, 5, 1, 0, 0, 0, 0, "UTC").unwrap();
        let interval = diff(&a, &a, DiffRegime::Exact);
        assert_eq!(interval.iso_duration(), "P0Y0M0DT0H0M0S");
    }

    #[test]
    fn test_iso_duration_unsigned_for_inverted() {
        assert_eq!(inverted_interval().iso_duration(), "P0Y1M0DT23H0M0S");
    }

    // ── format ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_lowercase_tokens_unpadded() {
        let interval = sample_interval();
        assert_eq!(interval.format("%y/%m/%d %h:%i:%s"), "0/1/0 23:0:0");
    }

    #[test]
    fn test_format_uppercase_tokens_padded() {
        let interval = sample_interval();
        assert_eq!(interval.format("%Y-%M-%D %H:%I:%S"), "00-01-00 23:00:00");
    }

    #[test]
    fn test_format_total_days_token() {
        assert_eq!(sample_interval().format("%a"), "30");
    }

    #[test]
    fn test_format_sign_tokens() {
        assert_eq!(sample_interval().format("%R%d"), "+0");
        assert_eq!(inverted_interval().format("%R%m"), "-1");
        assert_eq!(sample_interval().format("%r%m"), "1");
        assert_eq!(inverted_interval().format("%r%m"), "-1");
    }

    #[test]
    fn test_format_literal_percent_and_passthrough() {
        let interval = sample_interval();
        assert_eq!(interval.format("100%% done"), "100% done");
        assert_eq!(interval.format("%x"), "x");
        assert_eq!(interval.format("%"), "%");
    }

    #[test]
    fn test_format_microsecond_tokens() {
        let a = CalendarMoment::from_civil(2019, 5, 1, 0, 0, 0, 0, "UTC").unwrap();
        let b = CalendarMoment::from_civil(2019, 5, 1, 0, 0, 0, 42, "UTC").unwrap();
        let interval = diff(&a, &b, DiffRegime::Exact);
        assert_eq!(interval.format("%f"), "42");
        assert_eq!(interval.format("%F"), "000042");
    }

    // ── Interop ─────────────────────────────────────────────────────────

    #[test]
    fn test_to_raw_interval_mirrors_fields() {
        let interval = sample_interval();
        let raw = interval.to_raw_interval();
        assert_eq!(raw.years, interval.years());
        assert_eq!(raw.months, interval.months());
        assert_eq!(raw.days, interval.days());
        assert_eq!(raw.hours, interval.hours());
        assert_eq!(raw.invert, interval.invert());
        assert_eq!(raw.total_days, interval.total_days_unsigned());
    }

    #[test]
    fn test_serialize_to_json() {
        let json = serde_json::to_value(sample_interval()).unwrap();
        assert_eq!(json["months"], 1);
        assert_eq!(json["hours"], 23);
        assert_eq!(json["invert"], false);
        assert_eq!(json["iso_duration"], "P0Y1M0DT23H0M0S");
    }
}
