//! Time ranges and the two predicates slot generation is built on.
//!
//! Coverage is closed: a range covers itself, and an inner range may touch the
//! outer range's boundaries exactly. Overlap is half-open: two ranges that only
//! share an endpoint (one ends exactly when the other begins) do NOT overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A span on the UTC timeline from `begin` to `end`.
///
/// Fields are public so ranges can be deserialized from caller input; use
/// [`TimeRange::new`] or [`TimeRange::is_well_formed`] to enforce `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting one that ends before it begins.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRange` if `begin > end`.
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let range = Self { begin, end };
        range.validate()?;
        Ok(range)
    }

    /// Build a range of `length` starting at `begin`, or `None` if the end
    /// would fall off the representable timeline.
    pub fn starting_at(begin: DateTime<Utc>, length: Duration) -> Option<Self> {
        begin
            .checked_add_signed(length)
            .map(|end| Self { begin, end })
    }

    pub fn is_well_formed(&self) -> bool {
        self.begin <= self.end
    }

    /// # Errors
    /// Returns `SlotError::InvalidRange` if `begin > end`.
    pub fn validate(&self) -> Result<()> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(SlotError::InvalidRange {
                begin: self.begin,
                end: self.end,
            })
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }

    /// Whether `instant` lies in `[begin, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.begin <= instant && instant < self.end
    }
}

/// Does `outer` fully cover `inner`?
///
/// True iff `outer.begin <= inner.begin && outer.end >= inner.end`.
pub fn covers(outer: &TimeRange, inner: &TimeRange) -> bool {
    outer.begin <= inner.begin && outer.end >= inner.end
}

/// Do `a` and `b` share any instant?
///
/// Two ranges overlap iff `a.begin < b.end && b.begin < a.end`. This is
/// symmetric and also catches one range strictly containing the other.
/// Ranges that merely touch at an endpoint are not overlapping.
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    a.begin < b.end && b.begin < a.end
}
