//! Property-based tests for the slot search using proptest.
//!
//! These verify invariants that must hold for *any* valid configuration
//! and busy calendar, not just the specific scenarios in
//! `search_tests.rs`. "Now" is frozen before the search window so the
//! lead-time limits never interfere.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use slots_core::{
    find_available_time_slots_at, DateTimePeriod, Schedule, Shift, SlotStart,
    TimeSlotsFinderConfiguration,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_duration() -> impl Strategy<Value = u32> {
    prop_oneof![Just(15), Just(20), Just(30), Just(45), Just(60)]
}

fn arb_step() -> impl Strategy<Value = u32> {
    1u32..=30
}

/// Shift bounds as whole hours, always non-empty.
fn arb_shift_hours() -> impl Strategy<Value = (u32, u32)> {
    (6u32..=11, 12u32..=20)
}

/// A busy event inside the June 3-5 search window.
fn arb_event() -> impl Strategy<Value = DateTimePeriod> {
    (
        3u32..=5,
        0u32..=22,
        prop_oneof![Just(0u32), Just(15), Just(30), Just(45)],
        15i64..=120,
    )
        .prop_map(|(day, hour, minute, length)| {
            let start = Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap();
            DateTimePeriod {
                start_at: start,
                end_at: start + Duration::minutes(length),
            }
        })
}

fn arb_events() -> impl Strategy<Value = Vec<DateTimePeriod>> {
    proptest::collection::vec(arb_event(), 0..6)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn configuration(duration: u32, step: u32, shift: (u32, u32)) -> TimeSlotsFinderConfiguration {
    let mut schedule = Schedule::new();
    for day in ["2024-06-03", "2024-06-04", "2024-06-05"] {
        schedule.insert(
            day.to_string(),
            vec![Shift {
                start: format!("{:02}:00", shift.0),
                end: format!("{:02}:00", shift.1),
            }],
        );
    }
    TimeSlotsFinderConfiguration {
        schedule,
        unavailable_periods: Vec::new(),
        time_zone: "UTC".to_string(),
        time_slot_duration: duration,
        slot_start: SlotStart::MinuteStep(step),
        custom_slots: None,
        min_available_time_before_slot: 0,
        min_available_time_after_slot: 0,
        min_time_before_first_slot: 0,
        max_days_before_last_slot: None,
    }
}

fn window() -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 6, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    )
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Output is chronologically ordered and non-overlapping
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_sorted_and_non_overlapping(
        duration in arb_duration(),
        step in arb_step(),
        shift in arb_shift_hours(),
        events in arb_events(),
    ) {
        let cfg = configuration(duration, step, shift);
        let (from, to, now) = window();
        let slots = find_available_time_slots_at(&events, &cfg, from, to, now).unwrap();

        for pair in slots.windows(2) {
            prop_assert!(
                pair[0].end_at <= pair[1].start_at,
                "slots overlap or regress: {:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Every slot has exactly the configured duration
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_have_the_configured_duration(
        duration in arb_duration(),
        step in arb_step(),
        shift in arb_shift_hours(),
        events in arb_events(),
    ) {
        let cfg = configuration(duration, step, shift);
        let (from, to, now) = window();
        let slots = find_available_time_slots_at(&events, &cfg, from, to, now).unwrap();

        let expected = Duration::minutes(i64::from(duration));
        for slot in &slots {
            prop_assert_eq!(slot.end_at - slot.start_at, expected);
            prop_assert_eq!(slot.duration, duration);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: No slot leaves the caller's search window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_stay_inside_the_window(
        duration in arb_duration(),
        step in arb_step(),
        shift in arb_shift_hours(),
        events in arb_events(),
    ) {
        let cfg = configuration(duration, step, shift);
        let (from, to, now) = window();
        let slots = find_available_time_slots_at(&events, &cfg, from, to, now).unwrap();

        for slot in &slots {
            prop_assert!(slot.start_at >= from, "slot starts before the window");
            prop_assert!(slot.end_at <= to, "slot ends after the window");
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: With zero buffers, no slot overlaps any busy event
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_never_overlap_busy_events(
        duration in arb_duration(),
        step in arb_step(),
        shift in arb_shift_hours(),
        events in arb_events(),
    ) {
        let cfg = configuration(duration, step, shift);
        let (from, to, now) = window();
        let slots = find_available_time_slots_at(&events, &cfg, from, to, now).unwrap();

        for slot in &slots {
            for event in &events {
                prop_assert!(
                    !(slot.start_at < event.end_at && slot.end_at > event.start_at),
                    "slot {:?} overlaps busy event {:?}",
                    slot,
                    event
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Identical inputs and frozen "now" give identical output
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn search_is_idempotent(
        duration in arb_duration(),
        step in arb_step(),
        shift in arb_shift_hours(),
        events in arb_events(),
    ) {
        let cfg = configuration(duration, step, shift);
        let (from, to, now) = window();
        let first = find_available_time_slots_at(&events, &cfg, from, to, now).unwrap();
        let second = find_available_time_slots_at(&events, &cfg, from, to, now).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 6: In an event-free calendar, every slot start sits on the grid
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn event_free_slots_align_to_the_minute_step(
        duration in arb_duration(),
        step in arb_step(),
        shift in arb_shift_hours(),
    ) {
        let cfg = configuration(duration, step, shift);
        let (from, to, now) = window();
        let slots = find_available_time_slots_at(&[], &cfg, from, to, now).unwrap();

        prop_assert!(!slots.is_empty(), "an open shift must yield slots");
        for slot in &slots {
            prop_assert_eq!(
                slot.start_at.minute() % step,
                0,
                "slot at {:?} is off the {}-minute grid",
                slot.start_at,
                step
            );
        }
    }
}
