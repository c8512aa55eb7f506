//! # slots-core
//!
//! Deterministic bookable time-slot search for booking and scheduling
//! systems.
//!
//! Given a calendar of busy periods, a date-keyed work schedule, a set of
//! date-bound exception periods, and a bag of scheduling-policy
//! parameters, the engine computes the exact set of bookable slots inside
//! a search window. The computation is pure and synchronous: no I/O, no
//! shared state, no caching; every call allocates fresh and may run
//! concurrently with any other.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use slots_core::{
//!     find_available_time_slots_at, Shift, SlotStart, TimeSlotsFinderConfiguration,
//! };
//!
//! let mut schedule = slots_core::Schedule::new();
//! schedule.insert(
//!     "2024-06-03".to_string(),
//!     vec![Shift { start: "09:00".into(), end: "12:00".into() }],
//! );
//! let configuration = TimeSlotsFinderConfiguration {
//!     schedule,
//!     unavailable_periods: Vec::new(),
//!     time_zone: "UTC".to_string(),
//!     time_slot_duration: 60,
//!     slot_start: SlotStart::MinuteStep(30),
//!     custom_slots: None,
//!     min_available_time_before_slot: 0,
//!     min_available_time_after_slot: 0,
//!     min_time_before_first_slot: 0,
//!     max_days_before_last_slot: None,
//! };
//!
//! let slots = find_available_time_slots_at(
//!     &[],
//!     &configuration,
//!     Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 6, 3, 23, 59, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
//! )
//! .unwrap();
//! assert_eq!(slots.len(), 3); // 09:00, 10:00, 11:00
//! ```
//!
//! ## Modules
//!
//! - [`config`] — configuration model and validation
//! - [`schedule`] — work shifts and per-day normalization
//! - [`timeline`] — busy-timeline construction
//! - [`policy`] — slot-start alignment policies
//! - [`search`] — boundaries, day iteration, and the greedy scan
//! - [`dst`] — DST-safe wall-clock resolution
//! - [`error`] — error types

pub mod config;
pub mod dst;
pub mod error;
pub mod policy;
pub mod schedule;
pub mod search;
pub mod timeline;

pub use config::{
    PeriodMoment, SlotStart, SlotStartKeyword, TimeSlotPeriod, TimeSlotsFinderConfiguration,
};
pub use error::TimeSlotsFinderError;
pub use policy::SlotStartPolicy;
pub use schedule::{merge_overlapping, normalize_schedule, Schedule, Shift};
pub use search::{find_available_time_slots, find_available_time_slots_at, TimeSlot};
pub use timeline::{build_busy_timeline, DateTimePeriod};
