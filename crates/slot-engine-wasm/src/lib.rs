//! WASM bindings for slot-engine.
//!
//! Exposes slot computation and the submission-time conflict check to the
//! browser booking form via `wasm-bindgen`. Complex values cross the boundary
//! as JSON strings in the same shapes the repositories store.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::Serialize;
use slot_engine::{time, Appointment, Service, Services, WorkingHours};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ConflictDto {
    id: Option<String>,
    start_datetime: String,
}

impl From<&Appointment> for ConflictDto {
    fn from(a: &Appointment) -> Self {
        Self {
            id: a.id.clone(),
            start_datetime: a.start_datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON input helpers. Plain `String` errors keep them testable off-wasm.
// ---------------------------------------------------------------------------

fn parse_working_hours(json: &str) -> Result<Option<WorkingHours>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid working hours JSON: {}", e))
}

fn parse_appointments(json: &str) -> Result<Vec<Appointment>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid appointments JSON: {}", e))
}

fn parse_services(json: &str) -> Result<Services, String> {
    serde_json::from_str::<Vec<Service>>(json)
        .map(|list| list.into_iter().collect())
        .map_err(|e| format!("Invalid services JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn slot_labels_json(
    date: &str,
    duration_minutes: i32,
    working_hours_json: &str,
    appointments_json: &str,
    services_json: &str,
) -> Result<String, String> {
    let day = time::parse_date(date).map_err(|e| e.to_string())?;
    let hours = parse_working_hours(working_hours_json)?;
    let appointments = parse_appointments(appointments_json)?;
    let services = parse_services(services_json)?;

    let slots = slot_engine::compute_available_slots(
        day,
        i64::from(duration_minutes),
        hours.as_ref(),
        &appointments,
        &services,
    )
    .map_err(|e| e.to_string())?;

    to_json(&slot_engine::slot_labels(&slots))
}

fn conflicts_json(
    start: &str,
    duration_minutes: i32,
    appointments_json: &str,
    services_json: &str,
) -> Result<String, String> {
    let start = time::parse_local_datetime(start).map_err(|e| e.to_string())?;
    if duration_minutes <= 0 {
        return Err(slot_engine::SlotError::InvalidDuration(i64::from(duration_minutes)).to_string());
    }
    let appointments = parse_appointments(appointments_json)?;
    let services = parse_services(services_json)?;

    let conflicts = slot_engine::find_conflicts(
        start,
        i64::from(duration_minutes),
        &appointments,
        &services,
    );
    let dtos: Vec<ConflictDto> = conflicts.into_iter().map(ConflictDto::from).collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the bookable slot labels for one day.
///
/// Returns a JSON array of `"H:MM"` strings in ascending order.
///
/// # Arguments
/// - `date` -- Calendar day, `YYYY-MM-DD`
/// - `duration_minutes` -- Length of the service being booked
/// - `working_hours_json` -- The weekday's `WorkingHours` object, or `null` for the default window
/// - `appointments_json` -- Array of appointment objects (any status; cancelled ones are ignored)
/// - `services_json` -- Array of `{id, duration_minutes}` used to size appointments without an end
#[wasm_bindgen(js_name = "computeAvailableSlots")]
pub fn compute_available_slots(
    date: &str,
    duration_minutes: i32,
    working_hours_json: &str,
    appointments_json: &str,
    services_json: &str,
) -> Result<String, JsValue> {
    slot_labels_json(
        date,
        duration_minutes,
        working_hours_json,
        appointments_json,
        services_json,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Re-check a chosen slot against the latest appointments before submitting.
///
/// Returns a JSON array of `{id, start_datetime}` for every non-cancelled
/// appointment overlapping `[start, start + duration)`. An empty array means
/// the slot is still free.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    start: &str,
    duration_minutes: i32,
    appointments_json: &str,
    services_json: &str,
) -> Result<String, JsValue> {
    conflicts_json(start, duration_minutes, appointments_json, services_json)
        .map_err(|e| JsValue::from_str(&e))
}
