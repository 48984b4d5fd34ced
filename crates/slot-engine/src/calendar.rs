//! Day-bucketed weekly and monthly views over many availability windows.
//!
//! A [`Calendar`] is anchored at a reference date and holds an ordered list of
//! availability windows plus one slot shape. A view initializes an empty bucket
//! for every date of the week (Monday to Sunday) or month containing the
//! reference date, walks every window with the calendar output shape, and
//! files each slot under its start date and time-of-day label. Slots starting
//! outside the period belong to an adjacent view and are dropped.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::SlotConfig;
use crate::error::Result;
use crate::generator::SlotRequest;
use crate::range::TimeRange;
use crate::slot::{twelve_hour_label, FormatKind, FormattedSlot, TimeLabelFn};

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// An availability range and the metadata attached to every slot it yields.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityWindow<M> {
    pub range: TimeRange,
    pub metadata: M,
}

/// Slots of one day, grouped by time-of-day label.
///
/// Labels keep first-insertion order and each label's slots keep generation
/// order, so windows contributing the same start time appear in the order
/// they were added to the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBuckets<M> {
    entries: Vec<(String, Vec<FormattedSlot<M>>)>,
    /// Label -> position in `entries`.
    index: HashMap<String, usize>,
}

impl<M> Default for TimeBuckets<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<M> TimeBuckets<M> {
    fn push(&mut self, label: String, slot: FormattedSlot<M>) {
        match self.index.get(&label) {
            Some(&position) => self.entries[position].1.push(slot),
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, vec![slot]));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&[FormattedSlot<M>]> {
        self.index
            .get(label)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FormattedSlot<M>])> {
        self.entries
            .iter()
            .map(|(label, slots)| (label.as_str(), slots.as_slice()))
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total slots across all labels.
    pub fn slot_count(&self) -> usize {
        self.entries.iter().map(|(_, slots)| slots.len()).sum()
    }
}

impl<M: Serialize> Serialize for TimeBuckets<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, slots) in &self.entries {
            map.serialize_entry(label, slots)?;
        }
        map.end()
    }
}

/// One week or month of bucketed slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView<M> {
    /// Midnight at the start of the first day.
    pub starts_at: DateTime<Utc>,
    /// Last nanosecond of the last day.
    pub ends_at: DateTime<Utc>,
    /// One entry per date in the period, including days without slots.
    pub slots: BTreeMap<NaiveDate, TimeBuckets<M>>,
}

impl<M> CalendarView<M> {
    pub fn day(&self, date: NaiveDate) -> Option<&TimeBuckets<M>> {
        self.slots.get(&date)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.values().map(TimeBuckets::slot_count).sum()
    }
}

/// Availability windows anchored at a reference date.
#[derive(Debug, Clone)]
pub struct Calendar<M = Value> {
    date: NaiveDate,
    config: SlotConfig,
    label: TimeLabelFn,
    availabilities: Vec<AvailabilityWindow<M>>,
}

impl<M> Calendar<M> {
    /// Create an empty calendar anchored at `date`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidSlotLength` or `SlotError::InvalidInterval`
    /// if `config` is not usable.
    pub fn new(date: NaiveDate, config: SlotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            date,
            config,
            label: twelve_hour_label,
            availabilities: Vec::new(),
        })
    }

    /// Use `label` for bucket keys instead of the 12-hour clock.
    pub fn with_labeler(mut self, label: TimeLabelFn) -> Self {
        self.label = label;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn config(&self) -> SlotConfig {
        self.config
    }

    pub fn availabilities(&self) -> &[AvailabilityWindow<M>] {
        &self.availabilities
    }

    /// Append an availability window.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRange` if `range.begin > range.end`; the
    /// window is not added.
    pub fn add_availability(&mut self, range: TimeRange, metadata: M) -> Result<()> {
        range.validate()?;
        self.availabilities.push(AvailabilityWindow { range, metadata });
        Ok(())
    }
}

impl<M: Clone> Calendar<M> {
    /// Slots for the Monday-to-Sunday week containing the reference date.
    ///
    /// # Errors
    /// Propagates generation errors; none occur for a calendar built through
    /// [`Calendar::new`] and [`Calendar::add_availability`].
    pub fn weekly(&self) -> Result<CalendarView<M>> {
        let (first, last) = week_bounds(self.date);
        self.view(first, last)
    }

    /// Slots for the calendar month containing the reference date.
    ///
    /// # Errors
    /// See [`Calendar::weekly`].
    pub fn monthly(&self) -> Result<CalendarView<M>> {
        let (first, last) = month_bounds(self.date);
        self.view(first, last)
    }

    /// Calendar anchored at the Monday of the previous week.
    pub fn previous_week(&self) -> Self {
        let (monday, _) = week_bounds(self.date);
        self.anchored_at(monday.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN))
    }

    /// Calendar anchored at the Monday of the next week.
    pub fn next_week(&self) -> Self {
        let (_, sunday) = week_bounds(self.date);
        self.anchored_at(sunday.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    /// Calendar anchored at the first day of the previous month.
    pub fn previous_month(&self) -> Self {
        let (first, _) = month_bounds(self.date);
        self.anchored_at(
            first
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Calendar anchored at the first day of the next month.
    pub fn next_month(&self) -> Self {
        let (_, last) = month_bounds(self.date);
        self.anchored_at(last.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    fn anchored_at(&self, date: NaiveDate) -> Self {
        Self {
            date,
            config: self.config,
            label: self.label,
            availabilities: self.availabilities.clone(),
        }
    }

    fn view(&self, first: NaiveDate, last: NaiveDate) -> Result<CalendarView<M>> {
        let starts_at = first.and_time(NaiveTime::MIN).and_utc();
        let ends_at = last.and_time(END_OF_DAY).and_utc();
        let period = TimeRange {
            begin: starts_at,
            end: ends_at,
        };

        let mut slots: BTreeMap<NaiveDate, TimeBuckets<M>> = first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| (date, TimeBuckets::default()))
            .collect();

        let mut dropped = 0usize;
        for window in &self.availabilities {
            // Closed on both ends: a window starting at `ends_at` still has a
            // slot on the last day.
            if window.range.begin > period.end || window.range.end < period.begin {
                trace!(begin = %window.range.begin, "availability outside period");
                continue;
            }

            let request = SlotRequest::new(window.range, self.config)
                .with_format(FormatKind::Calendar)
                .with_metadata(window.metadata.clone());

            for slot in request.walker()? {
                let begin = slot.range.begin;
                match slots.get_mut(&begin.date_naive()) {
                    Some(day) => {
                        let label = (self.label)(begin);
                        day.push(label, request.format.project(&slot, self.label));
                    }
                    None => {
                        trace!(%begin, "slot outside period dropped");
                        dropped += 1;
                    }
                }
            }
        }

        let view = CalendarView {
            starts_at,
            ends_at,
            slots,
        };
        debug!(
            %first,
            %last,
            availabilities = self.availabilities.len(),
            filed = view.slot_count(),
            dropped,
            "calendar view built"
        );
        Ok(view)
    }
}

/// Monday and Sunday of the week containing `date`.
fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let since_monday = u64::from(date.weekday().num_days_from_monday());
    let monday = date
        .checked_sub_days(Days::new(since_monday))
        .unwrap_or(NaiveDate::MIN);
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    (monday, sunday)
}

/// First and last day of the month containing `date`.
fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}
