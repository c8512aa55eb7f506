//! Configuration model and validation.
//!
//! The types mirror the caller-facing JSON shape: camelCase keys, optional
//! minute quantities defaulting to zero. Defaults are resolved here at the
//! serde boundary so the algorithms never see a missing value, and minute
//! quantities are unsigned so "negative buffer" is unrepresentable rather
//! than checked.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeSlotsFinderError};
use crate::schedule::{parse_shift_time, Schedule};

/// A partially-specified calendar moment used by unavailable periods and
/// custom slot times.
///
/// `month` is zero-based (0 = January, 11 = December). An unset `hour`
/// denotes start-of-day when the moment opens a period and end-of-day when
/// it closes one. An unset `year` makes the enclosing period recur
/// annually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMoment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
}

/// A caller-declared exception interval (holiday, vacation, closure) that
/// removes availability regardless of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotPeriod {
    pub start_at: PeriodMoment,
    pub end_at: PeriodMoment,
}

/// The slot-start rule as written in configuration: a minute step (1-30),
/// `"every-hour"`, or `"custom"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotStart {
    MinuteStep(u32),
    Keyword(SlotStartKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotStartKeyword {
    EveryHour,
    Custom,
}

/// Immutable input bundle for a slot search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotsFinderConfiguration {
    /// Shifts worked per calendar date.
    pub schedule: Schedule,
    /// Exception intervals removing availability.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_periods: Vec<TimeSlotPeriod>,
    /// IANA zone name all wall-clock values are interpreted in.
    pub time_zone: String,
    /// Slot length in minutes.
    pub time_slot_duration: u32,
    /// Where new slots may start.
    pub slot_start: SlotStart,
    /// Explicit times of day, required iff `slot_start` is `"custom"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_slots: Option<Vec<PeriodMoment>>,
    /// Idle minutes required immediately before a slot.
    #[serde(default)]
    pub min_available_time_before_slot: u32,
    /// Idle minutes required immediately after a slot.
    #[serde(default)]
    pub min_available_time_after_slot: u32,
    /// Minutes between "now" and the earliest permitted slot.
    #[serde(default)]
    pub min_time_before_first_slot: u32,
    /// Days between "now" and the latest permitted slot; unbounded when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_before_last_slot: Option<u32>,
}

impl TimeSlotsFinderConfiguration {
    /// Check the configuration for internal consistency, failing fast on
    /// the first violation.
    ///
    /// Runs before every search. A passing configuration cannot make the
    /// search itself fail. Overlapping shifts within a day are not a
    /// violation; they are silently merged before the search.
    pub fn validate(&self) -> Result<()> {
        if self.time_slot_duration < 1 {
            return Err(TimeSlotsFinderError::InvalidSlotDuration(
                self.time_slot_duration,
            ));
        }
        match self.slot_start {
            SlotStart::Keyword(SlotStartKeyword::Custom) => {
                let slots = self.custom_slots.as_deref().unwrap_or_default();
                if slots.is_empty() {
                    return Err(TimeSlotsFinderError::MissingCustomSlots);
                }
                for (index, moment) in slots.iter().enumerate() {
                    check_time_of_day(moment).map_err(|reason| {
                        TimeSlotsFinderError::InvalidCustomSlot { index, reason }
                    })?;
                }
            }
            SlotStart::MinuteStep(step) if !(1..=30).contains(&step) => {
                return Err(TimeSlotsFinderError::InvalidSlotStartStep(step));
            }
            _ => {}
        }
        if self.max_days_before_last_slot == Some(0) {
            return Err(TimeSlotsFinderError::InvalidMaxDays);
        }
        self.parse_time_zone()?;
        if let Some(days) = self.max_days_before_last_slot {
            // Integer form of minTimeBeforeFirstSlot / (24*60) <= maxDays.
            if u64::from(self.min_time_before_first_slot) > u64::from(days) * 24 * 60 {
                return Err(TimeSlotsFinderError::ContradictorySlotBounds {
                    minutes: self.min_time_before_first_slot,
                    days,
                });
            }
        }
        for (day, shifts) in &self.schedule {
            for shift in shifts {
                for time in [&shift.start, &shift.end] {
                    if parse_shift_time(time).is_none() {
                        return Err(TimeSlotsFinderError::InvalidShiftTime {
                            day: day.clone(),
                            time: time.clone(),
                        });
                    }
                }
                if shift.end <= shift.start {
                    return Err(TimeSlotsFinderError::InvalidShiftOrder {
                        day: day.clone(),
                        start: shift.start.clone(),
                        end: shift.end.clone(),
                    });
                }
            }
        }
        for (index, period) in self.unavailable_periods.iter().enumerate() {
            check_period(period).map_err(|reason| {
                TimeSlotsFinderError::InvalidUnavailablePeriod { index, reason }
            })?;
        }
        Ok(())
    }

    /// Resolve the configured IANA zone name.
    pub fn parse_time_zone(&self) -> Result<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| TimeSlotsFinderError::InvalidTimezone(self.time_zone.clone()))
    }
}

fn check_period(period: &TimeSlotPeriod) -> std::result::Result<(), String> {
    if period.start_at.year.is_some() != period.end_at.year.is_some() {
        return Err("startAt and endAt must both set a year or both leave it unset".to_string());
    }
    check_moment(&period.start_at)?;
    check_moment(&period.end_at)
}

fn check_moment(moment: &PeriodMoment) -> std::result::Result<(), String> {
    if moment.month > 11 {
        return Err(format!("month {} out of range 0-11", moment.month));
    }
    let max_day = days_in_month(moment.month, moment.year);
    if moment.day < 1 || moment.day > max_day {
        return Err(format!(
            "day {} out of range 1-{} for month {}",
            moment.day, max_day, moment.month
        ));
    }
    check_time_of_day(moment)
}

fn check_time_of_day(moment: &PeriodMoment) -> std::result::Result<(), String> {
    if let Some(hour) = moment.hour {
        if hour > 23 {
            return Err(format!("hour {} out of range 0-23", hour));
        }
    }
    if let Some(minute) = moment.minute {
        if minute > 59 {
            return Err(format!("minute {} out of range 0-59", minute));
        }
    }
    Ok(())
}

/// Days in a zero-based month. Without a year, February keeps its leap
/// length so annually recurring Feb 29 closures stay representable.
fn days_in_month(month0: u32, year: Option<i32>) -> u32 {
    match month0 {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 => match year {
            Some(y) if !is_leap_year(y) => 28,
            _ => 29,
        },
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
