//! Work-shift model and per-day schedule normalization.
//!
//! Shifts are wall-clock `"HH:MM"` intervals within a single calendar day.
//! Overlapping or touching shifts are repaired with the same
//! sort-then-sweep pass the busy timeline uses for instant intervals;
//! normalization never rejects, it merges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A contiguous work interval within one calendar day, as local wall-clock
/// `"HH:MM"` strings. For zero-padded times, lexical order is
/// chronological order, which the merge sweep relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub start: String,
    pub end: String,
}

/// Mapping from `"YYYY-MM-DD"` date keys to the shifts worked that day.
pub type Schedule = BTreeMap<String, Vec<Shift>>;

/// Parse a strict `"HH:MM"` time into `(hour, minute)`.
///
/// Rejects anything but exactly two digits, a colon, and two digits, with
/// hour in 0-23 and minute in 0-59.
pub fn parse_shift_time(value: &str) -> Option<(u32, u32)> {
    let (hh, mm) = value.split_once(':')?;
    if hh.len() != 2 || mm.len() != 2 {
        return None;
    }
    if !hh.bytes().all(|b| b.is_ascii_digit()) || !mm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hh.parse().ok()?;
    let minute: u32 = mm.parse().ok()?;
    (hour <= 23 && minute <= 59).then_some((hour, minute))
}

/// Merge overlapping or touching shifts into a minimal sorted list.
///
/// Shifts are sorted by `start` and swept left to right; a shift starting
/// at or before the running `end` extends the current span. The output is
/// sorted, non-overlapping, and never longer than the input.
pub fn merge_overlapping(shifts: &[Shift]) -> Vec<Shift> {
    let mut sorted = shifts.to_vec();
    sorted.sort_by(|a, b| a.start.cmp(&b.start));

    let mut merged: Vec<Shift> = Vec::with_capacity(sorted.len());
    for shift in sorted {
        if let Some(last) = merged.last_mut() {
            if last.end >= shift.start {
                if shift.end > last.end {
                    last.end = shift.end;
                }
                continue;
            }
        }
        merged.push(shift);
    }
    merged
}

/// Apply [`merge_overlapping`] to every day of a schedule.
pub fn normalize_schedule(schedule: &Schedule) -> Schedule {
    schedule
        .iter()
        .map(|(day, shifts)| (day.clone(), merge_overlapping(shifts)))
        .collect()
}
