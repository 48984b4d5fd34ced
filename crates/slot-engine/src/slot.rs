//! Slots and the output shapes they can be projected into.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::range::TimeRange;

/// Turns an instant into the time-of-day label used for `full` / `plain`
/// output and for calendar bucket keys.
pub type TimeLabelFn = fn(DateTime<Utc>) -> String;

/// 12-hour clock label with zero-padded hour and minute, e.g. `"08:05 AM"`.
pub fn twelve_hour_label(at: DateTime<Utc>) -> String {
    at.format("%I:%M %p").to_string()
}

/// A candidate that survived coverage and exclusion checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<M> {
    pub range: TimeRange,
    pub metadata: M,
}

/// Supported output shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// `{start_time, end_time, time}`.
    #[default]
    Full,
    /// `{start_time, end_time, metadata}`.
    Calendar,
    /// Just the time-of-day label.
    Plain,
}

impl FormatKind {
    pub const ALL: [FormatKind; 3] = [FormatKind::Full, FormatKind::Calendar, FormatKind::Plain];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Full => "full",
            FormatKind::Calendar => "calendar",
            FormatKind::Plain => "plain",
        }
    }

    /// Project a slot into this shape.
    pub fn project<M: Clone>(self, slot: &Slot<M>, label: TimeLabelFn) -> FormattedSlot<M> {
        match self {
            FormatKind::Full => FormattedSlot::Full {
                start_time: slot.range.begin,
                end_time: slot.range.end,
                time: label(slot.range.begin),
            },
            FormatKind::Calendar => FormattedSlot::Calendar {
                start_time: slot.range.begin,
                end_time: slot.range.end,
                metadata: slot.metadata.clone(),
            },
            FormatKind::Plain => FormattedSlot::Plain(label(slot.range.begin)),
        }
    }
}

impl FromStr for FormatKind {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SlotError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slot projected through a [`FormatKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedSlot<M> {
    Full {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        time: String,
    },
    Calendar {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        metadata: M,
    },
    Plain(String),
}

impl<M> FormattedSlot<M> {
    /// Start of the slot, when the shape still carries it.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        match self {
            FormattedSlot::Full { start_time, .. } | FormattedSlot::Calendar { start_time, .. } => {
                Some(*start_time)
            }
            FormattedSlot::Plain(_) => None,
        }
    }

    /// End of the slot, when the shape still carries it.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        match self {
            FormattedSlot::Full { end_time, .. } | FormattedSlot::Calendar { end_time, .. } => {
                Some(*end_time)
            }
            FormattedSlot::Plain(_) => None,
        }
    }
}
