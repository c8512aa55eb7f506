//! DST-safe wall-clock resolution helpers.
//!
//! The search walks calendar days and shift bounds as wall-clock values in
//! the configured zone; these helpers pin them to concrete instants. On a
//! fall-back fold the earliest instant wins; inside a spring-forward gap
//! the probe advances until the zone can represent it.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Resolve a naive wall-clock datetime to an instant in `tz`.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Spring-forward gap. Real-world gaps are at most a few hours,
            // so a short forward probe always lands on a representable time.
            let mut probe = naive;
            loop {
                probe += Duration::minutes(15);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt;
                }
            }
        }
    }
}

/// First instant of `date` in `tz`.
pub fn day_start(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last represented instant of `date` in `tz` (23:59:59.999 wall clock).
pub fn day_end(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let end = date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1);
    resolve_local(tz, end)
}

/// `hour:minute` wall clock on `date` in `tz`. Callers pass pre-validated
/// hour/minute values.
pub fn at_wall_time(tz: Tz, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Tz> {
    let time = NaiveTime::MIN + Duration::minutes(i64::from(hour * 60 + minute));
    resolve_local(tz, date.and_time(time))
}

/// Round an instant up to the next whole minute (identity when already
/// whole).
pub fn ceil_to_minute(dt: DateTime<Tz>) -> DateTime<Tz> {
    let sub = subminute_nanos(&dt);
    if sub == 0 {
        dt
    } else {
        dt - Duration::nanoseconds(sub) + Duration::minutes(1)
    }
}

/// Round an instant down to the whole minute.
pub fn floor_to_minute(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt - Duration::nanoseconds(subminute_nanos(&dt))
}

fn subminute_nanos(dt: &DateTime<Tz>) -> i64 {
    i64::from(dt.second()) * 1_000_000_000 + i64::from(dt.nanosecond().min(999_999_999))
}
