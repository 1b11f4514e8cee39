//! Zoned calendar moments over the IANA timezone database.
//!
//! A [`CalendarMoment`] is an immutable instant with microsecond resolution
//! plus an attached civil timezone. It exposes the instant's epoch
//! microseconds, its civil fields as observed in its own zone, and the two
//! re-zoning operations the diff engine is built on:
//!
//! - [`CalendarMoment::re_zone_true`] keeps the absolute instant and changes
//!   the wall-clock digits per the new zone's offset.
//! - [`CalendarMoment::relabel_to`] keeps the wall-clock digits verbatim and
//!   only swaps the zone tag, thereby denoting a different absolute instant.
//!
//! All constructors take the timezone explicitly; there is no process-wide
//! default zone and no system clock access.

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{DeltaError, Result};

// ── Civil field view ────────────────────────────────────────────────────────

/// The civil calendar fields of a moment, observed in its own timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CivilFields {
    pub year: i32,
    /// Month of year (1-12).
    pub month: u32,
    /// Day of month (1-31).
    pub day: u32,
    /// Hour of day (0-23).
    pub hour: u32,
    /// Minute of hour (0-59).
    pub minute: u32,
    /// Second of minute (0-59).
    pub second: u32,
    /// Microsecond of second (0-999999).
    pub microsecond: u32,
}

// ── CalendarMoment ──────────────────────────────────────────────────────────

/// An immutable instant in a civil timezone.
///
/// Equality compares the absolute instant: two moments denoting the same
/// epoch microsecond are equal even when their zone tags differ.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMoment {
    local: DateTime<Tz>,
}

impl CalendarMoment {
    /// Construct from an RFC 3339 datetime string, true-re-zoned into an
    /// IANA timezone.
    ///
    /// The input carries its own offset (or `Z`); the resulting moment
    /// denotes the same instant expressed in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidDatetime`] if the datetime string cannot
    /// be parsed, or [`DeltaError::InvalidTimezone`] if the timezone name is
    /// not a valid IANA timezone.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronodelta::CalendarMoment;
    ///
    /// let m = CalendarMoment::parse("2019-03-31T01:30:00Z", "Europe/Copenhagen").unwrap();
    /// // 01:30 UTC is 03:30 CEST: the spring-forward shift has just happened.
    /// assert_eq!(m.hour(), 3);
    /// ```
    pub fn parse(datetime: &str, timezone: &str) -> Result<CalendarMoment> {
        let dt = parse_rfc3339(datetime)?;
        let tz = parse_timezone(timezone)?;
        Ok(CalendarMoment {
            local: dt.with_timezone(&tz),
        })
    }

    /// Construct from a civil datetime string without offset
    /// (`YYYY-MM-DDTHH:MM:SS`, optional fractional seconds), interpreted as
    /// wall-clock time in an IANA timezone.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidDatetime`] if the string cannot be
    /// parsed or names an ambiguous or nonexistent local time, or
    /// [`DeltaError::InvalidTimezone`] for an unknown zone.
    pub fn parse_civil(datetime: &str, timezone: &str) -> Result<CalendarMoment> {
        let tz = parse_timezone(timezone)?;
        let naive = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| DeltaError::InvalidDatetime(format!("'{datetime}': {e}")))?;
        zone_local(tz, naive)
    }

    /// Construct from epoch microseconds, observed in an IANA timezone.
    pub fn from_epoch_micros(micros: i64, timezone: &str) -> Result<CalendarMoment> {
        let tz = parse_timezone(timezone)?;
        let utc = DateTime::from_timestamp_micros(micros).ok_or_else(|| {
            DeltaError::InvalidDatetime(format!("epoch microseconds out of range: {micros}"))
        })?;
        Ok(CalendarMoment {
            local: utc.with_timezone(&tz),
        })
    }

    /// Construct from explicit civil fields in an IANA timezone.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidDatetime`] if the fields do not name a
    /// valid calendar date/time, or if the wall-clock time is ambiguous or
    /// nonexistent in the zone (DST fold or gap). Ambiguity is never
    /// resolved by guessing.
    #[allow(clippy::too_many_arguments)]
    pub fn from_civil(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        timezone: &str,
    ) -> Result<CalendarMoment> {
        let tz = parse_timezone(timezone)?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            DeltaError::InvalidDatetime(format!("invalid civil date {year:04}-{month:02}-{day:02}"))
        })?;
        if microsecond >= 1_000_000 {
            return Err(DeltaError::InvalidDatetime(format!(
                "microsecond field out of range: {microsecond}"
            )));
        }
        let time = NaiveTime::from_hms_micro_opt(hour, minute, second, microsecond).ok_or_else(
            || {
                DeltaError::InvalidDatetime(format!(
                    "invalid civil time {hour:02}:{minute:02}:{second:02}.{microsecond:06}"
                ))
            },
        )?;
        zone_local(tz, date.and_time(time))
    }

    // ── Field access ────────────────────────────────────────────────────

    /// Epoch microseconds of the instant (UTC-anchored, zone-independent).
    pub fn epoch_micros(&self) -> i64 {
        self.local.timestamp_micros()
    }

    /// The IANA name of the attached timezone.
    pub fn timezone_name(&self) -> &'static str {
        self.local.timezone().name()
    }

    pub fn year(&self) -> i32 {
        self.local.year()
    }

    pub fn month(&self) -> u32 {
        self.local.month()
    }

    pub fn day(&self) -> u32 {
        self.local.day()
    }

    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    pub fn second(&self) -> u32 {
        self.local.second()
    }

    pub fn microsecond(&self) -> u32 {
        self.local.timestamp_subsec_micros()
    }

    /// All civil fields as one value.
    pub fn civil_fields(&self) -> CivilFields {
        CivilFields {
            year: self.year(),
            month: self.month(),
            day: self.day(),
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            microsecond: self.microsecond(),
        }
    }

    /// RFC 3339 representation with the zone's UTC offset.
    pub fn to_rfc3339(&self) -> String {
        self.local.to_rfc3339()
    }

    // ── Re-zoning ───────────────────────────────────────────────────────

    /// True re-zoning: the same absolute instant expressed in another zone.
    ///
    /// The epoch is preserved; the wall-clock digits change per the target
    /// zone's offset at that instant.
    pub fn re_zone_true(&self, timezone: &str) -> Result<CalendarMoment> {
        let tz = parse_timezone(timezone)?;
        Ok(CalendarMoment {
            local: self.local.with_timezone(&tz),
        })
    }

    /// Relabeling: the same wall-clock digits tagged with another zone.
    ///
    /// The digits are kept verbatim, so the result denotes a different
    /// absolute instant whenever the offsets differ.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidDatetime`] when the digits are ambiguous
    /// or nonexistent in the target zone.
    pub fn relabel_to(&self, timezone: &str) -> Result<CalendarMoment> {
        let tz = parse_timezone(timezone)?;
        zone_local(tz, self.local.naive_local())
    }

    // ── Calendar navigation ─────────────────────────────────────────────

    /// Add (or subtract) whole calendar days, preserving the wall-clock
    /// time across DST transitions.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidDatetime`] when the resulting wall-clock
    /// time is ambiguous or nonexistent in the zone.
    pub fn add_days(&self, days: i64) -> Result<CalendarMoment> {
        let date = self.local.date_naive() + chrono::Duration::days(days);
        zone_local(self.local.timezone(), date.and_time(self.local.time()))
    }

    /// Add (or subtract) whole calendar months, clamping the day of month
    /// to the target month's length (Jan 31 + 1 month = Feb 28/29).
    pub fn add_months(&self, months: i32) -> Result<CalendarMoment> {
        let date = self.local.date_naive();
        let shifted = if months >= 0 {
            date.checked_add_months(Months::new(months as u32))
        } else {
            date.checked_sub_months(Months::new(months.unsigned_abs()))
        }
        .ok_or_else(|| {
            DeltaError::InvalidDatetime(format!("date out of range after adding {months} months"))
        })?;
        zone_local(self.local.timezone(), shifted.and_time(self.local.time()))
    }

    /// The same date at 00:00:00 local time.
    pub fn start_of_day(&self) -> Result<CalendarMoment> {
        zone_local(
            self.local.timezone(),
            self.local.date_naive().and_time(NaiveTime::MIN),
        )
    }

    /// The last day of the moment's month, keeping the time of day.
    pub fn end_of_month(&self) -> Result<CalendarMoment> {
        let (y, m) = if self.local.month() == 12 {
            (self.local.year() + 1, 1)
        } else {
            (self.local.year(), self.local.month() + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|first_next| first_next.pred_opt())
            .ok_or_else(|| {
                DeltaError::InvalidDatetime(format!("date out of range in year {y}"))
            })?;
        zone_local(self.local.timezone(), last_day.and_time(self.local.time()))
    }

    // ── Engine internals ────────────────────────────────────────────────

    /// The instant true-re-zoned to UTC. Infallible.
    pub(crate) fn utc_instant(&self) -> DateTime<Utc> {
        self.local.with_timezone(&Utc)
    }

    /// The wall-clock digits relabeled as UTC. Infallible: every civil
    /// datetime exists exactly once in UTC.
    pub(crate) fn wall_digits_as_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.local.naive_local())
    }
}

impl Serialize for CalendarMoment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CalendarMoment", 2)?;
        state.serialize_field("datetime", &self.to_rfc3339())?;
        state.serialize_field("timezone", self.timezone_name())?;
        state.end()
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DeltaError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DeltaError::InvalidTimezone(format!("'{}'", s)))
}

/// Attach a zone to a naive local datetime, rejecting DST folds and gaps.
fn zone_local(tz: Tz, naive: NaiveDateTime) -> Result<CalendarMoment> {
    tz.from_local_datetime(&naive)
        .single()
        .map(|local| CalendarMoment { local })
        .ok_or_else(|| {
            DeltaError::InvalidDatetime(format!(
                "ambiguous or nonexistent local time {naive} in {}",
                tz.name()
            ))
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────
