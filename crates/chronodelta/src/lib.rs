//! # chronodelta
//!
//! DST-aware calendar arithmetic for civil timezones.
//!
//! Computes the difference between two points in time expressed in possibly
//! different, possibly daylight-saving-time-observing timezones, and
//! classifies the overlap relationship between two closed time spans.
//! Whenever the UTC offset changes between two endpoints, "elapsed real
//! time" and "elapsed calendar fields" disagree; the engine computes both
//! views and reconciles them into one interval, with a selectable regime
//! for callers that want DST-ignorant wall-clock differences instead.
//!
//! ## Modules
//!
//! - [`moment`] — Zoned calendar moments: construction, civil fields, true
//!   re-zoning and relabeling, calendar navigation
//! - [`diff`] — The diff engine and its regime selector
//! - [`interval`] — The immutable interval value type with signed totals,
//!   ISO-8601 duration, and pattern formatting
//! - [`span`] — Closed time spans: overlap classification and cross-span
//!   distance
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chronodelta::{diff, CalendarMoment, DiffRegime};
//!
//! let a = CalendarMoment::from_civil(2019, 3, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
//! let b = CalendarMoment::from_civil(2019, 4, 1, 0, 0, 0, 0, "Europe/Copenhagen").unwrap();
//!
//! // March 2019 spans the spring-forward shift: one calendar month,
//! // 743 real hours rather than the habitual 744.
//! let exact = diff(&a, &b, DiffRegime::Exact);
//! assert_eq!(exact.total_months(), 1);
//! assert_eq!(exact.total_hours(), 743);
//!
//! let habitual = diff(&a, &b, DiffRegime::Habitual);
//! assert_eq!(habitual.total_hours(), 744);
//! ```

pub mod diff;
pub mod error;
pub mod interval;
pub mod moment;
pub mod span;

pub use diff::{diff, CalendarComponents, DiffRegime};
pub use error::{DeltaError, Result};
pub use interval::TimeInterval;
pub use moment::{CalendarMoment, CivilFields};
pub use span::{OverlapKind, SpanDistance, TimeSpan};
