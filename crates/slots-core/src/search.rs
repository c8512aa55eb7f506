//! The slot search: window boundaries, day iteration, and the greedy scan.
//!
//! Throughout this module the scan cursor (`search_moment`) marks the
//! start of the required lead buffer, never the slot start itself; the
//! emitted slot begins one lead buffer later. Keeping that invariant in
//! one place is what keeps the buffer arithmetic honest.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::TimeSlotsFinderConfiguration;
use crate::dst;
use crate::error::{Result, TimeSlotsFinderError};
use crate::policy::SlotStartPolicy;
use crate::schedule::{normalize_schedule, parse_shift_time};
use crate::timeline::{build_busy_timeline, DateTimePeriod};

/// A bookable slot. Serialized with epoch-millisecond timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_at: DateTime<Utc>,
    /// Slot length in minutes.
    pub duration: u32,
}

/// Compute every bookable slot between `from` and `to`.
///
/// `calendar_events` are busy intervals already resolved by the caller
/// (synced calendars, existing bookings). The configuration is validated
/// before any search work begins; an empty result is a valid outcome, not
/// an error. Slots are returned in chronological order.
pub fn find_available_time_slots(
    calendar_events: &[DateTimePeriod],
    configuration: &TimeSlotsFinderConfiguration,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    find_available_time_slots_at(calendar_events, configuration, from, to, Utc::now())
}

/// [`find_available_time_slots`] with an explicit "now".
///
/// The lead-time limits (`minTimeBeforeFirstSlot`,
/// `maxDaysBeforeLastSlot`) are measured from `now`; injecting it keeps
/// searches reproducible.
pub fn find_available_time_slots_at(
    calendar_events: &[DateTimePeriod],
    configuration: &TimeSlotsFinderConfiguration,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    if from > to {
        return Err(TimeSlotsFinderError::InvalidSearchPeriod);
    }
    configuration.validate()?;
    let tz = configuration.parse_time_zone()?;
    let policy = SlotStartPolicy::from_configuration(configuration)?;
    let schedule = normalize_schedule(&configuration.schedule);

    let Some((first_from, last_to)) = search_boundaries(configuration, tz, from, to, now) else {
        return Ok(Vec::new());
    };

    // One timeline for the whole search, wide enough to cover every
    // per-shift scan window.
    let lead = Duration::minutes(i64::from(configuration.min_available_time_before_slot));
    let tail = Duration::minutes(
        i64::from(configuration.time_slot_duration)
            + i64::from(configuration.min_available_time_before_slot),
    );
    let timeline = build_busy_timeline(
        &configuration.unavailable_periods,
        calendar_events,
        tz,
        (first_from - lead).with_timezone(&Utc),
        (last_to + tail).with_timezone(&Utc),
    );

    let mut slots = Vec::new();
    let mut cursor = first_from;
    while cursor <= last_to {
        let day = cursor.date_naive();
        if let Some(shifts) = schedule.get(&day.format("%Y-%m-%d").to_string()) {
            for shift in shifts {
                // Validated above; skip defensively rather than panic.
                let Some((sh, sm)) = parse_shift_time(&shift.start) else {
                    continue;
                };
                let Some((eh, em)) = parse_shift_time(&shift.end) else {
                    continue;
                };
                let shift_start = dst::at_wall_time(tz, day, sh, sm);
                let shift_end = dst::at_wall_time(tz, day, eh, em);
                let partial_from = first_from.max(shift_start);
                let partial_to = last_to.min(shift_end);
                if partial_from > partial_to {
                    continue;
                }
                search_shift(
                    &mut slots,
                    configuration,
                    &policy,
                    &timeline,
                    partial_from,
                    partial_to,
                );
            }
        }
        match day.succ_opt() {
            Some(next) => cursor = dst::day_start(tz, next),
            None => break,
        }
    }
    Ok(slots)
}

/// Derive the effective search window from the caller bounds, "now", and
/// the lead-time limits. Returns `None` when the window is empty.
///
/// No emitted slot starts before the first bound or ends after the last
/// one; the trailing buffer may extend past it.
fn search_boundaries(
    configuration: &TimeSlotsFinderConfiguration,
    tz: Tz,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let now = now.with_timezone(&tz);
    let earliest = now
        + Duration::minutes(
            i64::from(configuration.min_available_time_before_slot)
                + i64::from(configuration.min_time_before_first_slot),
        );
    let first_from = from.with_timezone(&tz).max(earliest);

    let mut last_to = to.with_timezone(&tz);
    if let Some(days) = configuration.max_days_before_last_slot {
        let limit_day = (now + Duration::days(i64::from(days))).date_naive();
        last_to = last_to.min(dst::day_end(tz, limit_day));
    }
    (first_from <= last_to).then_some((first_from, last_to))
}

/// Scan one clipped shift window, appending every compliant slot.
fn search_shift(
    slots: &mut Vec<TimeSlot>,
    configuration: &TimeSlotsFinderConfiguration,
    policy: &SlotStartPolicy,
    timeline: &[DateTimePeriod],
    from: DateTime<Tz>,
    to: DateTime<Tz>,
) {
    let duration = configuration.time_slot_duration;
    let lead_minutes = configuration.min_available_time_before_slot;
    let lead = Duration::minutes(i64::from(lead_minutes));
    let slot_len = Duration::minutes(i64::from(duration));
    // Free time a candidate needs: lead buffer + slot + trailing buffer.
    let window = Duration::minutes(
        i64::from(lead_minutes)
            + i64::from(duration)
            + i64::from(configuration.min_available_time_after_slot),
    );

    let mut search_moment = from - lead;
    // Second 59 admits equality at the last whole minute: a slot placed
    // exactly there still fits its duration before `to`.
    let search_end = dst::floor_to_minute(to - slot_len - lead) + Duration::seconds(59);

    // Busy intervals that ended before the scan starts are irrelevant.
    let mut index = timeline.partition_point(|p| p.end_at <= search_moment);
    let mut realign = true;

    while search_moment <= search_end {
        if realign {
            search_moment = policy.next_anchor(search_moment, lead_minutes);
            if search_moment > search_end {
                break;
            }
        }
        let free_time_limit = search_moment + window;
        match timeline.get(index) {
            Some(busy) if busy.start_at < free_time_limit => {
                // Collision: resume at the busy interval's end. For a
                // minute-step rule the interval end is itself a valid
                // anchor (the step is scan granularity inside a free
                // stretch); hour and custom anchors are absolute, so those
                // policies realign on the next pass.
                search_moment = dst::ceil_to_minute(busy.end_at.with_timezone(&from.timezone()));
                index += 1;
                realign = !matches!(policy, SlotStartPolicy::FixedStep(_));
            }
            _ => {
                let start_at = search_moment + lead;
                let end_at = start_at + slot_len;
                slots.push(TimeSlot {
                    start_at: start_at.with_timezone(&Utc),
                    end_at: end_at.with_timezone(&Utc),
                    duration,
                });
                search_moment = end_at - lead;
                realign = true;
            }
        }
    }
}
