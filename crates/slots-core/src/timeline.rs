//! Busy-timeline construction.
//!
//! Materializes the configuration's unavailable periods into concrete
//! instant pairs in the target zone, concatenates them with the caller's
//! busy calendar events, and reduces the result to a minimal sorted
//! timeline for the shift scan: window-filtered, start-sorted, with
//! periods fully inside an earlier period removed.

use std::cmp::Reverse;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::{PeriodMoment, TimeSlotPeriod};
use crate::dst;

/// A concrete busy interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimePeriod {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Build the sorted, de-duplicated busy timeline for one search.
///
/// Unavailable periods are materialized in `tz`. Year-less periods recur
/// annually: they are materialized once per calendar year the filter
/// window touches, plus the preceding year so an annual closure wrapping
/// the new year still lands inside the window. The combined list is then
/// filtered to periods strictly overlapping `[filter_min, filter_max]`,
/// sorted by start, and stripped of periods fully encompassed by an
/// earlier one.
pub fn build_busy_timeline(
    unavailable_periods: &[TimeSlotPeriod],
    calendar_events: &[DateTimePeriod],
    tz: Tz,
    filter_min: DateTime<Utc>,
    filter_max: DateTime<Utc>,
) -> Vec<DateTimePeriod> {
    let first_year = filter_min.with_timezone(&tz).year();
    let last_year = filter_max.with_timezone(&tz).year();

    let mut periods: Vec<DateTimePeriod> = Vec::new();
    for period in unavailable_periods {
        if period.start_at.year.is_some() {
            periods.extend(materialize(period, first_year, tz));
        } else {
            for year in (first_year - 1)..=last_year {
                periods.extend(materialize(period, year, tz));
            }
        }
    }
    periods.extend(calendar_events.iter().copied());

    // Strict overlap with the filter window.
    periods.retain(|p| p.start_at < filter_max && p.end_at > filter_min);

    // Ties on start keep the longest period first, so the encompass scan
    // below only ever needs to look backwards.
    periods.sort_by_key(|p| (p.start_at, Reverse(p.end_at)));

    let mut timeline: Vec<DateTimePeriod> = Vec::with_capacity(periods.len());
    let mut max_end: Option<DateTime<Utc>> = None;
    for period in periods {
        if let Some(end) = max_end {
            if end > period.end_at {
                // Fully inside an earlier period.
                continue;
            }
        }
        max_end = Some(max_end.map_or(period.end_at, |e| e.max(period.end_at)));
        timeline.push(period);
    }
    timeline
}

/// Materialize one unavailable period against an anchor year.
///
/// Returns `None` when the period does not exist for that year (e.g. an
/// annual Feb 29 closure in a non-leap year) or collapses to nothing.
fn materialize(period: &TimeSlotPeriod, anchor_year: i32, tz: Tz) -> Option<DateTimePeriod> {
    let start = moment_to_start(&period.start_at, anchor_year, tz)?;
    let mut end = moment_to_end(&period.end_at, anchor_year, tz)?;
    if period.start_at.year.is_none() && end < start {
        // Annual period wrapping the year boundary: the end belongs to the
        // following year.
        end = plus_one_year(end, tz)?;
    }
    (end > start).then_some(DateTimePeriod {
        start_at: start.with_timezone(&Utc),
        end_at: end.with_timezone(&Utc),
    })
}

/// An hour-less start floors to start-of-day.
fn moment_to_start(moment: &PeriodMoment, anchor_year: i32, tz: Tz) -> Option<DateTime<Tz>> {
    let date = moment_date(moment, anchor_year)?;
    match moment.hour {
        Some(hour) => {
            let time = NaiveTime::from_hms_opt(hour, moment.minute.unwrap_or(0), 0)?;
            Some(dst::resolve_local(tz, date.and_time(time)))
        }
        None => Some(dst::day_start(tz, date)),
    }
}

/// An hour-less end ceils to end-of-day.
fn moment_to_end(moment: &PeriodMoment, anchor_year: i32, tz: Tz) -> Option<DateTime<Tz>> {
    let date = moment_date(moment, anchor_year)?;
    match moment.hour {
        Some(hour) => {
            let time = NaiveTime::from_hms_opt(hour, moment.minute.unwrap_or(0), 0)?;
            Some(dst::resolve_local(tz, date.and_time(time)))
        }
        None => Some(dst::day_end(tz, date)),
    }
}

fn moment_date(moment: &PeriodMoment, anchor_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        moment.year.unwrap_or(anchor_year),
        moment.month + 1,
        moment.day,
    )
}

fn plus_one_year(dt: DateTime<Tz>, tz: Tz) -> Option<DateTime<Tz>> {
    let naive = dt.naive_local();
    let date = naive.date();
    let shifted = NaiveDate::from_ymd_opt(date.year() + 1, date.month(), date.day())?;
    Some(dst::resolve_local(tz, shifted.and_time(naive.time())))
}
