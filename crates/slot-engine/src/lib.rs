//! # slot-engine
//!
//! Deterministic generation of bookable time slots from availability windows.
//!
//! A source range is walked in fixed-length, fixed-interval steps. Candidates
//! that leave the range or intersect an exclusion window are skipped, the rest
//! are projected into one of a few output shapes. A [`Calendar`] aggregates the
//! slots of many availability windows into day-bucketed weekly or monthly views.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use slot_engine::{generate_slots, FormattedSlot, TimeRange};
//!
//! let range = TimeRange::new(
//!     Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap(),
//! )
//! .unwrap();
//!
//! let slots = generate_slots(range, 60, 15, "plain", &[], false).unwrap();
//! let labels: Vec<_> = slots
//!     .iter()
//!     .map(|s| match s {
//!         FormattedSlot::Plain(label) => label.as_str(),
//!         _ => unreachable!(),
//!     })
//!     .collect();
//! assert_eq!(labels, ["08:00 AM", "08:15 AM", "08:30 AM"]);
//! ```
//!
//! ## Modules
//!
//! - [`range`] — `TimeRange` and the coverage / overlap predicates
//! - [`slot`] — slots, output shapes and time-of-day labels
//! - [`generator`] — validated slot walking
//! - [`calendar`] — weekly / monthly day-bucket aggregation
//! - [`config`] — slot shape configuration
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod error;
pub mod generator;
pub mod range;
pub mod slot;

pub use calendar::{AvailabilityWindow, Calendar, CalendarView, TimeBuckets};
pub use config::SlotConfig;
pub use error::SlotError;
pub use generator::{generate, generate_slots, SlotRequest, SlotWalker};
pub use range::{covers, overlaps, TimeRange};
pub use slot::{twelve_hour_label, FormatKind, FormattedSlot, Slot, TimeLabelFn};
