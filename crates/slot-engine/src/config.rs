//! Slot shape configuration.
//!
//! Lengths and intervals are given in whole minutes at the interface and
//! converted to `chrono::Duration` once, after positivity checks. A zero or
//! negative interval would never advance the walk, so it is rejected up front.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

const DEFAULT_SLOT_LENGTH_MINUTES: i64 = 60;
const DEFAULT_INTERVAL_MINUTES: i64 = 60;

/// Length of every slot and spacing between successive candidate starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    #[serde(default = "default_slot_length_minutes")]
    pub slot_length_minutes: i64,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: i64,
}

fn default_slot_length_minutes() -> i64 {
    DEFAULT_SLOT_LENGTH_MINUTES
}

fn default_interval_minutes() -> i64 {
    DEFAULT_INTERVAL_MINUTES
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            slot_length_minutes: DEFAULT_SLOT_LENGTH_MINUTES,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

impl SlotConfig {
    pub fn new(slot_length_minutes: i64, interval_minutes: i64) -> Self {
        Self {
            slot_length_minutes,
            interval_minutes,
        }
    }

    /// # Errors
    /// Returns `SlotError::InvalidSlotLength` unless the length is positive.
    pub fn slot_length(&self) -> Result<Duration> {
        positive_minutes(self.slot_length_minutes)
            .ok_or(SlotError::InvalidSlotLength(self.slot_length_minutes))
    }

    /// # Errors
    /// Returns `SlotError::InvalidInterval` unless the interval is positive.
    pub fn interval(&self) -> Result<Duration> {
        positive_minutes(self.interval_minutes)
            .ok_or(SlotError::InvalidInterval(self.interval_minutes))
    }

    /// Check both values, slot length first.
    ///
    /// # Errors
    /// See [`SlotConfig::slot_length`] and [`SlotConfig::interval`].
    pub fn validate(&self) -> Result<(Duration, Duration)> {
        Ok((self.slot_length()?, self.interval()?))
    }
}

fn positive_minutes(minutes: i64) -> Option<Duration> {
    if minutes <= 0 {
        return None;
    }
    Duration::try_minutes(minutes)
}
