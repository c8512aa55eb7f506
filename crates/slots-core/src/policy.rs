//! Slot-start alignment policies.
//!
//! A policy maps the scan cursor (the start of the required lead buffer,
//! never the slot itself) to the next position whose slot start is an
//! allowed anchor: a minute-step grid position, the top of an hour, or one
//! of an explicit list of times of day.

use chrono::{DateTime, Duration, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::config::{SlotStart, SlotStartKeyword, TimeSlotsFinderConfiguration};
use crate::dst;
use crate::error::{Result, TimeSlotsFinderError};

/// A resolved slot-start rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStartPolicy {
    /// Slot starts align to wall-clock minutes divisible by the step.
    FixedStep(u32),
    /// Slot starts land exactly on the hour.
    EveryHour,
    /// Slot starts are limited to these times of day.
    Custom(Vec<NaiveTime>),
}

impl SlotStartPolicy {
    /// Resolve the configuration's slot-start rule into a policy.
    pub fn from_configuration(configuration: &TimeSlotsFinderConfiguration) -> Result<Self> {
        match configuration.slot_start {
            SlotStart::MinuteStep(step) => {
                if !(1..=30).contains(&step) {
                    return Err(TimeSlotsFinderError::InvalidSlotStartStep(step));
                }
                Ok(Self::FixedStep(step))
            }
            SlotStart::Keyword(SlotStartKeyword::EveryHour) => Ok(Self::EveryHour),
            SlotStart::Keyword(SlotStartKeyword::Custom) => {
                let mut times: Vec<NaiveTime> = configuration
                    .custom_slots
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|m| {
                        NaiveTime::from_hms_opt(m.hour.unwrap_or(0), m.minute.unwrap_or(0), 0)
                    })
                    .collect();
                if times.is_empty() {
                    return Err(TimeSlotsFinderError::MissingCustomSlots);
                }
                times.sort_unstable();
                times.dedup();
                Ok(Self::Custom(times))
            }
        }
    }

    /// Advance `moment` to the next allowed anchor position.
    ///
    /// `moment` is the candidate start of the lead buffer; the slot itself
    /// would begin `lead_minutes` later, and that later position is what
    /// must satisfy the policy. The result never precedes the whole-minute
    /// ceiling of `moment`: during a DST fold a wall-aligned time can
    /// resolve to an earlier instant, and the cursor must not move
    /// backwards.
    pub fn next_anchor(&self, moment: DateTime<Tz>, lead_minutes: u32) -> DateTime<Tz> {
        let rounded = dst::ceil_to_minute(moment);
        let lead = Duration::minutes(i64::from(lead_minutes));
        let slot_start_at = rounded + lead;

        let candidate = match self {
            Self::FixedStep(step) => {
                let step = *step;
                let minute_to_add = (step - slot_start_at.minute() % step) % step;
                rounded + Duration::minutes(i64::from(minute_to_add))
            }
            Self::EveryHour => {
                let past_hour = i64::from(slot_start_at.minute());
                let to_hour = if past_hour == 0 { 0 } else { 60 - past_hour };
                slot_start_at + Duration::minutes(to_hour) - lead
            }
            Self::Custom(times) => {
                let local = slot_start_at.naive_local();
                match times.iter().find(|t| **t >= local.time()) {
                    Some(time) => {
                        dst::resolve_local(slot_start_at.timezone(), local.date().and_time(*time))
                            - lead
                    }
                    // No anchor left today: push the cursor far past any
                    // search window so the shift scan ends. The magnitude
                    // is arbitrary.
                    None => rounded + Duration::days(3650),
                }
            }
        };
        candidate.max(rounded)
    }
}
