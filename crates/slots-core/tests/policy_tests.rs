//! Tests for slot-start alignment policies.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use chrono_tz::Tz;
use slots_core::{
    PeriodMoment, Schedule, SlotStart, SlotStartKeyword, SlotStartPolicy,
    TimeSlotsFinderConfiguration,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn utc() -> Tz {
    "UTC".parse().unwrap()
}

fn at(hour: u32, minute: u32, second: u32) -> DateTime<Tz> {
    utc()
        .with_ymd_and_hms(2024, 6, 3, hour, minute, second)
        .unwrap()
}

fn time_of_day(hour: u32, minute: u32) -> PeriodMoment {
    PeriodMoment {
        year: None,
        month: 0,
        day: 1,
        hour: Some(hour),
        minute: Some(minute),
    }
}

// ── Fixed step ──────────────────────────────────────────────────────────────

#[test]
fn fixed_step_aligns_up_to_the_grid() {
    let policy = SlotStartPolicy::FixedStep(15);
    assert_eq!(policy.next_anchor(at(9, 7, 0), 0), at(9, 15, 0));
    assert_eq!(policy.next_anchor(at(9, 15, 0), 0), at(9, 15, 0));
    assert_eq!(policy.next_anchor(at(9, 46, 0), 0), at(10, 0, 0));
}

#[test]
fn fixed_step_rounds_seconds_up_to_the_next_minute() {
    let policy = SlotStartPolicy::FixedStep(5);
    // 09:00:30 ceils to 09:01, then aligns to 09:05.
    assert_eq!(policy.next_anchor(at(9, 0, 30), 0), at(9, 5, 0));
    // Already aligned but mid-minute: the ceiling lands past the anchor.
    assert_eq!(policy.next_anchor(at(9, 5, 1), 0), at(9, 10, 0));
}

#[test]
fn fixed_step_alignment_targets_the_slot_start_not_the_cursor() {
    // With a 15-minute lead buffer, the cursor sits one buffer before the
    // slot. A cursor of 08:45 means a slot at 09:00, which is on the grid,
    // so nothing moves.
    let policy = SlotStartPolicy::FixedStep(30);
    assert_eq!(policy.next_anchor(at(8, 45, 0), 15), at(8, 45, 0));
    // A cursor of 08:50 means a slot at 09:05; the next grid point is
    // 09:30, so the cursor advances by 25 minutes.
    assert_eq!(policy.next_anchor(at(8, 50, 0), 15), at(9, 15, 0));
}

// ── Every hour ──────────────────────────────────────────────────────────────

#[test]
fn every_hour_snaps_to_the_top_of_the_hour() {
    let policy = SlotStartPolicy::EveryHour;
    assert_eq!(policy.next_anchor(at(9, 0, 0), 0), at(9, 0, 0));
    assert_eq!(policy.next_anchor(at(9, 10, 0), 0), at(10, 0, 0));
    assert_eq!(policy.next_anchor(at(9, 59, 0), 0), at(10, 0, 0));
}

#[test]
fn every_hour_lands_the_slot_on_the_hour_despite_a_lead_buffer() {
    let policy = SlotStartPolicy::EveryHour;
    // Cursor 08:50 + 10 min lead = slot at 09:00: already on the hour.
    assert_eq!(policy.next_anchor(at(8, 50, 0), 10), at(8, 50, 0));
    // Cursor 09:00 + 10 min lead = slot at 09:10: next hour is 10:00, so
    // the cursor becomes 09:50 and the slot starts exactly at 10:00.
    assert_eq!(policy.next_anchor(at(9, 0, 0), 10), at(9, 50, 0));
}

// ── Custom times ────────────────────────────────────────────────────────────

#[test]
fn custom_picks_the_next_time_of_day() {
    let policy = SlotStartPolicy::Custom(vec![
        NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
    ]);
    assert_eq!(policy.next_anchor(at(9, 0, 0), 0), at(10, 30, 0));
    assert_eq!(policy.next_anchor(at(10, 30, 0), 0), at(10, 30, 0));
    assert_eq!(policy.next_anchor(at(11, 0, 0), 0), at(14, 0, 0));
}

#[test]
fn custom_subtracts_the_lead_buffer_from_the_anchor() {
    let policy = SlotStartPolicy::Custom(vec![NaiveTime::from_hms_opt(10, 30, 0).unwrap()]);
    // Slot must start at 10:30; with a 15-minute lead the cursor is 10:15.
    assert_eq!(policy.next_anchor(at(9, 0, 0), 15), at(10, 15, 0));
}

#[test]
fn custom_exhaustion_pushes_far_past_the_day() {
    // No custom time left today: the cursor jumps far enough to end the
    // shift scan. Only the effect matters, not the exact distance.
    let policy = SlotStartPolicy::Custom(vec![NaiveTime::from_hms_opt(10, 30, 0).unwrap()]);
    let pushed = policy.next_anchor(at(15, 0, 0), 0);
    assert!(pushed > at(15, 0, 0) + Duration::days(365));
}

// ── Resolution from configuration ───────────────────────────────────────────

#[test]
fn resolves_each_configuration_variant() {
    let mut config = TimeSlotsFinderConfiguration {
        schedule: Schedule::new(),
        unavailable_periods: Vec::new(),
        time_zone: "UTC".to_string(),
        time_slot_duration: 30,
        slot_start: SlotStart::MinuteStep(10),
        custom_slots: None,
        min_available_time_before_slot: 0,
        min_available_time_after_slot: 0,
        min_time_before_first_slot: 0,
        max_days_before_last_slot: None,
    };
    assert_eq!(
        SlotStartPolicy::from_configuration(&config).unwrap(),
        SlotStartPolicy::FixedStep(10)
    );

    config.slot_start = SlotStart::Keyword(SlotStartKeyword::EveryHour);
    assert_eq!(
        SlotStartPolicy::from_configuration(&config).unwrap(),
        SlotStartPolicy::EveryHour
    );

    config.slot_start = SlotStart::Keyword(SlotStartKeyword::Custom);
    config.custom_slots = Some(vec![
        time_of_day(14, 0),
        time_of_day(10, 30),
        time_of_day(14, 0),
    ]);
    // Times come back sorted and de-duplicated.
    assert_eq!(
        SlotStartPolicy::from_configuration(&config).unwrap(),
        SlotStartPolicy::Custom(vec![
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        ])
    );
}
