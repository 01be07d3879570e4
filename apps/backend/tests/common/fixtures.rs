//! Test fixtures and factory functions for creating request bodies.

use serde_json::{json, Value};

pub const WOKE_UP: &str = "woke-up";
pub const FELL_ASLEEP: &str = "fell-asleep";

/// Body for POST /api/entries.
pub fn entry_request(entry_type: &str, time: &str, date: Option<&str>) -> Value {
    match date {
        Some(date) => json!({ "type": entry_type, "time": time, "date": date }),
        None => json!({ "type": entry_type, "time": time }),
    }
}

/// The reference day: woke 07:00, nap 12:00-14:00, asleep 20:30.
pub fn reference_day() -> Vec<(&'static str, &'static str)> {
    vec![
        (WOKE_UP, "07:00"),
        (FELL_ASLEEP, "12:00"),
        (WOKE_UP, "14:00"),
        (FELL_ASLEEP, "20:30"),
    ]
}

/// Body for POST /api/settings/sleep.
pub fn settings_request(
    required_sleep_minutes: Option<i32>,
    nap: Option<&str>,
    bedtime: Option<&str>,
) -> Value {
    let mut body = json!({});
    if let Some(required) = required_sleep_minutes {
        body["requiredSleepMinutes"] = json!(required);
    }
    if let Some(nap) = nap {
        body["scheduledNapTime"] = json!(nap);
    }
    if let Some(bedtime) = bedtime {
        body["scheduledBedtime"] = json!(bedtime);
    }
    body
}
