//! WASM bindings for slots-core.
//!
//! Exposes the slot search and configuration validation to JavaScript via
//! `wasm-bindgen`. All complex values cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slots-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slots-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slots_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use slots_core::{DateTimePeriod, TimeSlotsFinderConfiguration};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for busy events passed from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventInput {
    start_at: String,
    end_at: String,
}

// ---------------------------------------------------------------------------
// Helper: parse an ISO 8601 string into a UTC DateTime
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g.,
/// "2024-06-03T09:00:00+00:00") and naive local time (e.g.,
/// "2024-06-03T09:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    // Try RFC 3339 first (has timezone info).
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Fall back to naive datetime interpreted as UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

/// Convert a JSON array of `{startAt, endAt}` objects into busy periods.
fn parse_events_json(json: &str) -> Result<Vec<DateTimePeriod>, JsValue> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let inputs: Vec<EventInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid events JSON: {}", e)))?;

    inputs
        .into_iter()
        .map(|input| {
            let start_at = parse_datetime(&input.start_at)?;
            let end_at = parse_datetime(&input.end_at)?;
            Ok(DateTimePeriod { start_at, end_at })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find every bookable time slot between `from` and `to`.
///
/// `events_json` is a JSON array of `{startAt, endAt}` objects (or an
/// empty string) and `configuration_json` the finder configuration.
/// Returns a JSON array of `{startAt, endAt, duration}` slots with
/// epoch-millisecond timestamps. Pass `now` to freeze the reference time
/// used by the lead-time limits; omit it to use the current time.
#[wasm_bindgen(js_name = "findAvailableTimeSlots")]
pub fn find_available_time_slots(
    events_json: &str,
    configuration_json: &str,
    from: &str,
    to: &str,
    now: Option<String>,
) -> Result<String, JsValue> {
    let events = parse_events_json(events_json)?;
    let configuration: TimeSlotsFinderConfiguration = serde_json::from_str(configuration_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid configuration JSON: {}", e)))?;
    let from = parse_datetime(from)?;
    let to = parse_datetime(to)?;
    let now = match now.as_deref() {
        Some(raw) => parse_datetime(raw)?,
        None => Utc::now(),
    };

    let slots = slots_core::find_available_time_slots_at(&events, &configuration, from, to, now)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&slots)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Validate a finder configuration.
///
/// Returns nothing on success; throws a JS error carrying the first
/// violation's message otherwise.
#[wasm_bindgen(js_name = "validateConfiguration")]
pub fn validate_configuration(configuration_json: &str) -> Result<(), JsValue> {
    let configuration: TimeSlotsFinderConfiguration = serde_json::from_str(configuration_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid configuration JSON: {}", e)))?;
    configuration
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
