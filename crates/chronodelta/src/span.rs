//! Closed time spans: overlap classification and cross-span distance.
//!
//! A [`TimeSpan`] is a closed range `[from, to]` of moments sharing one
//! timezone. Both endpoints' epoch microseconds are cached at construction,
//! so [`TimeSpan::overlap`] is pure integer comparison. When two spans are
//! disjoint, [`TimeSpan::distance`] measures the gap between the nearest
//! edges through the diff engine.

use serde::Serialize;

use crate::diff::{diff, DiffRegime};
use crate::error::{DeltaError, Result};
use crate::interval::TimeInterval;
use crate::moment::CalendarMoment;

// ── Overlap classification ──────────────────────────────────────────────────

/// How another span relates to a baseline span. Exactly one kind applies
/// to any pair of spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlapKind {
    /// The spans share no instant.
    None,
    /// Both bounds are equal.
    Identity,
    /// The other span fully contains the baseline.
    Encloses,
    /// The other span lies fully inside the baseline.
    IsSubset,
    /// The other span started before the baseline and ends inside it.
    EndsWithin,
    /// The other span starts inside the baseline and ends after it.
    BeginsWithin,
}

/// The result of measuring the distance between two spans: either they
/// overlap (there is no gap to measure) or the gap between their nearest
/// edges as an interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SpanDistance {
    Overlapping(OverlapKind),
    Gap(TimeInterval),
}

// ── TimeSpan ────────────────────────────────────────────────────────────────

/// A closed range of moments in one timezone.
///
/// Zero-length spans are permitted and represent a single instant.
/// Immutable after construction; overlap and distance calls never touch
/// the cached bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSpan {
    from: CalendarMoment,
    to: CalendarMoment,
    from_micros: i64,
    to_micros: i64,
}

impl TimeSpan {
    /// Validate and build a span, caching both endpoints' epoch
    /// microseconds.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidArgument`] when the endpoints carry
    /// different timezones or `from` is strictly later than `to` (equal
    /// endpoints are allowed).
    pub fn new(from: CalendarMoment, to: CalendarMoment) -> Result<TimeSpan> {
        if from.timezone_name() != to.timezone_name() {
            return Err(DeltaError::InvalidArgument(format!(
                "span endpoints must share one timezone, got {} and {}",
                from.timezone_name(),
                to.timezone_name()
            )));
        }
        let from_micros = from.epoch_micros();
        let to_micros = to.epoch_micros();
        if from_micros > to_micros {
            return Err(DeltaError::InvalidArgument(format!(
                "span start {} is later than span end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        Ok(TimeSpan {
            from,
            to,
            from_micros,
            to_micros,
        })
    }

    /// The span's starting moment.
    pub fn from(&self) -> &CalendarMoment {
        &self.from
    }

    /// The span's ending moment.
    pub fn to(&self) -> &CalendarMoment {
        &self.to
    }

    /// Cached epoch microseconds of the start.
    pub fn from_micros(&self) -> i64 {
        self.from_micros
    }

    /// Cached epoch microseconds of the end.
    pub fn to_micros(&self) -> i64 {
        self.to_micros
    }

    /// The IANA name of the span's timezone.
    pub fn timezone_name(&self) -> &'static str {
        self.from.timezone_name()
    }

    /// Classify how `other` relates to this span.
    ///
    /// The disjointness test runs first; the remaining kinds are tried in
    /// strict precedence order (Identity, Encloses, IsSubset, EndsWithin,
    /// BeginsWithin), of which exactly one must match.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidArgument`] when the spans carry
    /// different timezones, and [`DeltaError::InvariantBroken`] if the
    /// precedence chain is exhausted. The latter indicates an internal
    /// defect, never a usage error, and must not be swallowed by callers.
    pub fn overlap(&self, other: &TimeSpan) -> Result<OverlapKind> {
        if other.timezone_name() != self.timezone_name() {
            return Err(DeltaError::InvalidArgument(format!(
                "cannot compare spans in {} and {}",
                self.timezone_name(),
                other.timezone_name()
            )));
        }

        let (b_from, b_to) = (self.from_micros, self.to_micros);
        let (s_from, s_to) = (other.from_micros, other.to_micros);

        if s_to < b_from || s_from > b_to {
            return Ok(OverlapKind::None);
        }

        if s_from == b_from && s_to == b_to {
            Ok(OverlapKind::Identity)
        } else if s_from <= b_from && s_to >= b_to {
            Ok(OverlapKind::Encloses)
        } else if s_from >= b_from && s_to <= b_to {
            Ok(OverlapKind::IsSubset)
        } else if s_to < b_to {
            Ok(OverlapKind::EndsWithin)
        } else if s_from > b_from {
            Ok(OverlapKind::BeginsWithin)
        } else {
            Err(DeltaError::InvariantBroken(format!(
                "overlap precedence exhausted for [{b_from}, {b_to}] vs [{s_from}, {s_to}]"
            )))
        }
    }

    /// Measure the gap between this span and `other`.
    ///
    /// Overlapping spans have no gap: the overlap kind is returned instead.
    /// For disjoint spans the gap runs between the nearest edges, as a
    /// forward interval when `other` begins after this span ends and as an
    /// inverted interval when `other` ends before this span begins.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`TimeSpan::overlap`].
    pub fn distance(&self, other: &TimeSpan, regime: DiffRegime) -> Result<SpanDistance> {
        match self.overlap(other)? {
            OverlapKind::None => {
                let interval = if other.from_micros > self.to_micros {
                    diff(&self.to, &other.from, regime)
                } else {
                    diff(&self.from, &other.to, regime)
                };
                Ok(SpanDistance::Gap(interval))
            }
            kind => Ok(SpanDistance::Overlapping(kind)),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> CalendarMoment {
        CalendarMoment::from_civil(year, month, day, 0, 0, 0, 0, "Europe/Copenhagen").unwrap()
    }

    fn span(from: CalendarMoment, to: CalendarMoment) -> TimeSpan {
        TimeSpan::new(from, to).unwrap()
    }

    fn baseline() -> TimeSpan {
        span(day(2019, 1, 1), day(2019, 1, 30))
    }

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_reversed_bounds() {
        let result = TimeSpan::new(day(2019, 1, 30), day(2019, 1, 1));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Invalid argument"), "got: {err}");

        // Swapped arguments succeed.
        assert!(TimeSpan::new(day(2019, 1, 1), day(2019, 1, 30)).is_ok());
    }

    #[test]
    fn test_new_rejects_mixed_timezones() {
        let from = CalendarMoment::from_civil(2019, 1, 1, 0, 0, 0, 0, "UTC").unwrap();
        let to = day(2019, 1, 30);
        assert!(TimeSpan::new(from, to).is_err());
    }

    #[test]
    fn test_zero_length_span_allowed() {
        let instant = day(2019, 1, 15);
        let s = TimeSpan::new(instant.clone(), instant).unwrap();
        assert_eq!(s.from_micros(), s.to_micros());
    }

    #[test]
    fn test_caches_epoch_bounds() {
        let s = baseline();
        assert_eq!(s.from_micros(), s.from().epoch_micros());
        assert_eq!(s.to_micros(), s.to().epoch_micros());
        assert!(s.from_micros() < s.to_micros());
    }

    // ── Overlap classification ──────────────────────────────────────────

    #[test]
    fn test_overlap_none() {
        let other = span(day(2019, 1, 31), day(2019, 2, 4));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::None);
    }

    #[test]
    fn test_overlap_identity() {
        let other = span(day(2019, 1, 1), day(2019, 1, 30));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::Identity);
    }

    #[test]
    fn test_overlap_encloses() {
        let other = span(day(2018, 12, 31), day(2019, 1, 31));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::Encloses);
    }

    #[test]
    fn test_overlap_is_subset() {
        let other = span(day(2019, 1, 2), day(2019, 1, 29));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::IsSubset);
    }

    #[test]
    fn test_overlap_ends_within() {
        let other = span(day(2018, 12, 31), day(2019, 1, 1));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::EndsWithin);
    }

    #[test]
    fn test_overlap_begins_within() {
        let other = span(day(2019, 1, 30), day(2019, 1, 31));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::BeginsWithin);
    }

    #[test]
    fn test_overlap_shared_start_longer_end() {
        // Same start, other ends later: contains the baseline.
        let other = span(day(2019, 1, 1), day(2019, 2, 15));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::Encloses);
    }

    #[test]
    fn test_overlap_rejects_mixed_timezones() {
        let from = CalendarMoment::from_civil(2019, 1, 5, 0, 0, 0, 0, "UTC").unwrap();
        let to = CalendarMoment::from_civil(2019, 1, 10, 0, 0, 0, 0, "UTC").unwrap();
        let other = TimeSpan::new(from, to).unwrap();
        assert!(baseline().overlap(&other).is_err());
    }

    #[test]
    fn test_overlap_is_symmetric_for_none() {
        let other = span(day(2019, 2, 10), day(2019, 2, 20));
        assert_eq!(baseline().overlap(&other).unwrap(), OverlapKind::None);
        assert_eq!(other.overlap(&baseline()).unwrap(), OverlapKind::None);
    }

    #[test]
    fn test_overlap_containment_flips_between_views() {
        let outer = span(day(2018, 12, 31), day(2019, 1, 31));
        assert_eq!(baseline().overlap(&outer).unwrap(), OverlapKind::Encloses);
        assert_eq!(outer.overlap(&baseline()).unwrap(), OverlapKind::IsSubset);
    }

    // ── Distance ────────────────────────────────────────────────────────

    #[test]
    fn test_distance_overlapping_returns_kind() {
        let other = span(day(2019, 1, 2), day(2019, 1, 29));
        let result = baseline().distance(&other, DiffRegime::Exact).unwrap();
        assert_eq!(result, SpanDistance::Overlapping(OverlapKind::IsSubset));
    }

    #[test]
    fn test_distance_forward_gap() {
        let other = span(day(2019, 2, 4), day(2019, 2, 10));
        let result = baseline().distance(&other, DiffRegime::Exact).unwrap();
        match result {
            SpanDistance::Gap(interval) => {
                assert!(!interval.invert());
                assert_eq!(interval.total_days(), 5);
            }
            other => panic!("expected a gap, got {other:?}"),
        }
    }

    #[test]
    fn test_distance_backward_gap_is_inverted() {
        let other = span(day(2018, 12, 20), day(2018, 12, 29));
        let result = baseline().distance(&other, DiffRegime::Exact).unwrap();
        match result {
            SpanDistance::Gap(interval) => {
                assert!(interval.invert());
                assert_eq!(interval.total_days(), -3);
            }
            other => panic!("expected a gap, got {other:?}"),
        }
    }

    #[test]
    fn test_distance_gap_across_dst_respects_regime() {
        // Gap from March 30 to April 2 spans the 2019 spring-forward shift.
        let first = span(day(2019, 3, 25), day(2019, 3, 30));
        let second = span(day(2019, 4, 2), day(2019, 4, 5));

        let exact = first.distance(&second, DiffRegime::Exact).unwrap();
        match exact {
            SpanDistance::Gap(interval) => assert_eq!(interval.total_hours(), 71),
            other => panic!("expected a gap, got {other:?}"),
        }

        let habitual = first.distance(&second, DiffRegime::Habitual).unwrap();
        match habitual {
            SpanDistance::Gap(interval) => assert_eq!(interval.total_hours(), 72),
            other => panic!("expected a gap, got {other:?}"),
        }
    }

    #[test]
    fn test_distance_adjacent_spans_touch() {
        // Sharing a bound counts as overlap, not as a zero gap.
        let other = span(day(2019, 1, 30), day(2019, 2, 5));
        let result = baseline().distance(&other, DiffRegime::Exact).unwrap();
        assert_eq!(result, SpanDistance::Overlapping(OverlapKind::BeginsWithin));
    }
}
