//! Error types for slot-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Precondition violations raised before any slot is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The range ends before it begins.
    #[error("Invalid range: begin {begin} is after end {end}")]
    InvalidRange {
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Slot length is zero, negative, or too large to represent.
    #[error("Invalid slot length: {0} minutes (must be a positive number of minutes)")]
    InvalidSlotLength(i64),

    /// Interval is zero, negative, or too large to represent.
    #[error("Invalid interval: {0} minutes (must be a positive number of minutes)")]
    InvalidInterval(i64),

    /// The exclusion at `index` is not a well-formed range.
    #[error("Invalid exclusion at index {index}: begin {begin} is after end {end}")]
    InvalidExclusion {
        index: usize,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The requested output shape is not one of `full`, `calendar`, `plain`.
    #[error("Invalid format: '{0}' (expected one of: full, calendar, plain)")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
