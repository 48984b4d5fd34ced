//! Walk a source range in fixed steps and emit the candidates that fit.
//!
//! Starting at `range.begin`, each candidate is `slot_length` long and the next
//! one starts `interval` later. A candidate is emitted when it is covered by
//! the range (or, with run-over allowed, merely starts inside it) and does not
//! overlap any exclusion window. The walk stops at the first candidate that no
//! longer fits, so it takes at most `ceil(range / interval) + 1` steps.
//!
//! All validation happens before the first candidate is built: a request that
//! fails is reported with the specific [`SlotError`] and produces nothing.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use crate::config::SlotConfig;
use crate::error::{Result, SlotError};
use crate::range::{covers, overlaps, TimeRange};
use crate::slot::{twelve_hour_label, FormatKind, FormattedSlot, Slot, TimeLabelFn};

/// Everything a single generation call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRequest<M = ()> {
    /// The availability range to walk.
    pub range: TimeRange,
    /// Slot length and interval, in minutes.
    pub config: SlotConfig,
    /// Candidates overlapping any of these are skipped.
    pub exclusions: Vec<TimeRange>,
    /// Output shape for [`generate`].
    pub format: FormatKind,
    /// Emit slots that start inside the range but end past it.
    pub allow_run_over: bool,
    /// Copied onto every emitted slot.
    pub metadata: M,
}

impl SlotRequest<()> {
    pub fn new(range: TimeRange, config: SlotConfig) -> Self {
        Self {
            range,
            config,
            exclusions: Vec::new(),
            format: FormatKind::default(),
            allow_run_over: false,
            metadata: (),
        }
    }
}

impl<M> SlotRequest<M> {
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = TimeRange>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    pub fn with_format(mut self, format: FormatKind) -> Self {
        self.format = format;
        self
    }

    pub fn with_run_over(mut self, allow_run_over: bool) -> Self {
        self.allow_run_over = allow_run_over;
        self
    }

    pub fn with_metadata<N>(self, metadata: N) -> SlotRequest<N> {
        SlotRequest {
            range: self.range,
            config: self.config,
            exclusions: self.exclusions,
            format: self.format,
            allow_run_over: self.allow_run_over,
            metadata,
        }
    }

    /// Check the request without walking it.
    ///
    /// Checks run in order: range, slot length, interval, exclusions.
    ///
    /// # Errors
    /// Returns the `SlotError` for the first violated precondition.
    pub fn validate(&self) -> Result<()> {
        self.checked_steps().map(|_| ())
    }

    /// Validate the request and return a walker over its slots.
    ///
    /// # Errors
    /// See [`SlotRequest::validate`].
    pub fn walker(&self) -> Result<SlotWalker<'_, M>> {
        let (slot_length, interval) = self.checked_steps()?;
        Ok(SlotWalker {
            range: self.range,
            slot_length,
            interval,
            exclusions: &self.exclusions,
            allow_run_over: self.allow_run_over,
            metadata: &self.metadata,
            candidate: TimeRange::starting_at(self.range.begin, slot_length),
        })
    }

    fn checked_steps(&self) -> Result<(Duration, Duration)> {
        self.range.validate()?;
        let steps = self.config.validate()?;
        for (index, exclusion) in self.exclusions.iter().enumerate() {
            if !exclusion.is_well_formed() {
                return Err(SlotError::InvalidExclusion {
                    index,
                    begin: exclusion.begin,
                    end: exclusion.end,
                });
            }
        }
        Ok(steps)
    }
}

/// Lazy walk over the slots of a validated [`SlotRequest`].
///
/// Finite and not restartable; build a new walker to start over.
#[derive(Debug, Clone)]
pub struct SlotWalker<'a, M> {
    range: TimeRange,
    slot_length: Duration,
    interval: Duration,
    exclusions: &'a [TimeRange],
    allow_run_over: bool,
    metadata: &'a M,
    candidate: Option<TimeRange>,
}

impl<M> SlotWalker<'_, M> {
    fn fits(&self, candidate: &TimeRange) -> bool {
        covers(&self.range, candidate)
            || (self.allow_run_over && self.range.contains(candidate.begin))
    }

    fn next_candidate(&self, current: &TimeRange) -> Option<TimeRange> {
        let begin: DateTime<Utc> = current.begin.checked_add_signed(self.interval)?;
        TimeRange::starting_at(begin, self.slot_length)
    }
}

impl<M: Clone> Iterator for SlotWalker<'_, M> {
    type Item = Slot<M>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = self.candidate.take()?;
            if !self.fits(&candidate) {
                return None;
            }
            self.candidate = self.next_candidate(&candidate);

            if let Some(exclusion) = self.exclusions.iter().find(|e| overlaps(e, &candidate)) {
                trace!(
                    begin = %candidate.begin,
                    excluded_by = %exclusion.begin,
                    "candidate overlaps exclusion"
                );
                continue;
            }

            return Some(Slot {
                range: candidate,
                metadata: self.metadata.clone(),
            });
        }
    }
}

/// Generate formatted slots for a request, labelling times with `label`.
///
/// # Errors
/// Returns the `SlotError` for the first violated precondition; see
/// [`SlotRequest::validate`].
pub fn generate<M: Clone>(
    request: &SlotRequest<M>,
    label: TimeLabelFn,
) -> Result<Vec<FormattedSlot<M>>> {
    let format = request.format;
    let slots: Vec<FormattedSlot<M>> = request
        .walker()?
        .map(|slot| format.project(&slot, label))
        .collect();

    debug!(
        begin = %request.range.begin,
        end = %request.range.end,
        exclusions = request.exclusions.len(),
        %format,
        emitted = slots.len(),
        "slots generated"
    );

    Ok(slots)
}

/// Generate slots over `range` with lengths and intervals given in minutes.
///
/// `format` is one of `full`, `calendar`, `plain`; it is checked after the
/// other inputs but before any slot is produced, so an unknown format is
/// reported even when the range would yield no slots.
///
/// # Errors
/// - `SlotError::InvalidRange` if `range.begin > range.end`
/// - `SlotError::InvalidSlotLength` / `SlotError::InvalidInterval` if either
///   value is not positive
/// - `SlotError::InvalidExclusion` for the first malformed exclusion
/// - `SlotError::InvalidFormat` for an unknown format name
pub fn generate_slots(
    range: TimeRange,
    slot_length_minutes: i64,
    interval_minutes: i64,
    format: &str,
    exclusions: &[TimeRange],
    allow_run_over: bool,
) -> Result<Vec<FormattedSlot<()>>> {
    let request = SlotRequest::new(range, SlotConfig::new(slot_length_minutes, interval_minutes))
        .with_exclusions(exclusions.iter().copied())
        .with_run_over(allow_run_over);
    request.validate()?;

    let request = request.with_format(format.parse()?);
    generate(&request, twelve_hour_label)
}
