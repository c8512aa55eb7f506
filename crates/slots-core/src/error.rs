//! Error types for time-slot search operations.

use thiserror::Error;

/// Errors raised by configuration validation and search-boundary checks.
///
/// Every failure surfaces before any search work begins; once validation
/// passes, the search itself cannot fail and an empty result list is a
/// valid outcome.
#[derive(Error, Debug)]
pub enum TimeSlotsFinderError {
    #[error("Invalid search period: `from` must not be after `to`")]
    InvalidSearchPeriod,

    #[error("Slot duration must be at least 1 minute, got {0}")]
    InvalidSlotDuration(u32),

    #[error("The \"custom\" slot-start rule requires a non-empty `customSlots` list")]
    MissingCustomSlots,

    #[error("Slot-start minute step must be between 1 and 30, got {0}")]
    InvalidSlotStartStep(u32),

    #[error("`maxDaysBeforeLastSlot` must be at least 1 day")]
    InvalidMaxDays,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error(
        "`minTimeBeforeFirstSlot` ({minutes} min) pushes the first slot past \
         `maxDaysBeforeLastSlot` ({days} days): no slot can ever be produced"
    )]
    ContradictorySlotBounds { minutes: u32, days: u32 },

    #[error("Invalid shift time {time:?} on {day}: expected \"HH:MM\" between 00:00 and 23:59")]
    InvalidShiftTime { day: String, time: String },

    #[error("Invalid shift {start}-{end} on {day}: end must be after start")]
    InvalidShiftOrder {
        day: String,
        start: String,
        end: String,
    },

    #[error("Invalid unavailable period #{index}: {reason}")]
    InvalidUnavailablePeriod { index: usize, reason: String },

    #[error("Invalid custom slot #{index}: {reason}")]
    InvalidCustomSlot { index: usize, reason: String },
}

/// Convenience alias used throughout slots-core.
pub type Result<T> = std::result::Result<T, TimeSlotsFinderError>;
