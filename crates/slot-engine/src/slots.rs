//! Bookable slot computation for one calendar day.
//!
//! Candidates sit on a fixed half-hour grid aligned to the clock (`h:00` and
//! `h:30`). A candidate survives if the requested service fits entirely inside
//! the working window, misses the break, and misses every occupied range of a
//! non-cancelled appointment starting that day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::appointment::Appointment;
use crate::conflict::{occupied_intervals, overlaps};
use crate::error::{Result, SlotError};
use crate::repository::ServiceCatalog;
use crate::schedule::{DayOfWeek, DayWindow, WorkingHours};
use crate::time::{self, time_from_minutes};

/// Spacing of the candidate grid.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// A bookable start time and the range the new appointment would occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Slot {
    #[serde(with = "time::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "time::hhmm")]
    pub end: NaiveTime,
    pub duration_minutes: i64,
}

impl Slot {
    /// `"H:MM"`, as shown on the booking buttons.
    pub fn label(&self) -> String {
        time::label(self.start)
    }

    /// The slot's start on `day`.
    pub fn starts_at(&self, day: NaiveDate) -> NaiveDateTime {
        day.and_time(self.start)
    }
}

/// Why a grid candidate was dropped. Only used for trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    BeforeOpen,
    PastClose,
    Break,
    Booked,
}

/// Compute the ordered bookable slots for `day`.
///
/// * `requested_duration_minutes` — length of the service being booked.
/// * `working_hours` — the record for `day`'s weekday, or `None` to use
///   [`WorkingHours::fallback`].
/// * `appointments` — existing bookings. Cancelled ones and ones starting on
///   other days are ignored, so the caller may pass an unfiltered list.
/// * `services` — used to size appointments that have no stored end.
///
/// A closed day, a malformed window, or a service that fits nowhere gives an
/// empty list.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` if `requested_duration_minutes` is not
/// positive.
pub fn compute_available_slots<C: ServiceCatalog + ?Sized>(
    day: NaiveDate,
    requested_duration_minutes: i64,
    working_hours: Option<&WorkingHours>,
    appointments: &[Appointment],
    services: &C,
) -> Result<Vec<Slot>> {
    if requested_duration_minutes <= 0 {
        return Err(SlotError::InvalidDuration(requested_duration_minutes));
    }

    let weekday = DayOfWeek::of(day);
    let fallback;
    let hours = match working_hours {
        Some(hours) => {
            if hours.day_of_week != weekday {
                tracing::warn!(
                    %day,
                    expected = %weekday,
                    got = %hours.day_of_week,
                    "working hours are for a different weekday"
                );
            }
            hours
        }
        None => {
            tracing::debug!(%day, %weekday, "no working hours configured; using fallback window");
            fallback = WorkingHours::fallback(weekday);
            &fallback
        }
    };

    let Some(window) = hours.day_window() else {
        tracing::debug!(%day, %weekday, "closed day");
        return Ok(Vec::new());
    };

    let busy = occupied_intervals(day, appointments, services);

    let slots: Vec<Slot> = candidate_starts(&window)
        .filter_map(|start| {
            let Some(end) = start.checked_add(requested_duration_minutes) else {
                tracing::trace!(start, reason = ?Rejection::PastClose, "candidate rejected");
                return None;
            };
            match check_candidate(&window, &busy, start, end) {
                Ok(()) => Some(Slot {
                    start: time_from_minutes(start)?,
                    end: time_from_minutes(end)?,
                    duration_minutes: requested_duration_minutes,
                }),
                Err(reason) => {
                    tracing::trace!(start, end, ?reason, "candidate rejected");
                    None
                }
            }
        })
        .collect();

    tracing::debug!(
        %day,
        duration = requested_duration_minutes,
        busy = busy.len(),
        offered = slots.len(),
        "computed available slots"
    );
    Ok(slots)
}

/// Grid starts from the opening hour up to and including the closing hour.
///
/// Starts outside the window are filtered by [`check_candidate`].
fn candidate_starts(window: &DayWindow) -> impl Iterator<Item = i64> {
    let first_hour = window.open / 60;
    let last_hour = window.close / 60;
    (first_hour..=last_hour).flat_map(|hour| {
        (0..60)
            .step_by(SLOT_STEP_MINUTES as usize)
            .map(move |minute| hour * 60 + minute)
    })
}

fn check_candidate(
    window: &DayWindow,
    busy: &[(i64, i64)],
    start: i64,
    end: i64,
) -> std::result::Result<(), Rejection> {
    if start < window.open {
        return Err(Rejection::BeforeOpen);
    }
    if end > window.close {
        return Err(Rejection::PastClose);
    }
    if let Some((rest_start, rest_end)) = window.rest {
        if overlaps(start, end, rest_start, rest_end) {
            return Err(Rejection::Break);
        }
    }
    if busy
        .iter()
        .any(|&(busy_start, busy_end)| overlaps(start, end, busy_start, busy_end))
    {
        return Err(Rejection::Booked);
    }
    Ok(())
}

/// Labels for the booking UI, in slot order.
pub fn slot_labels(slots: &[Slot]) -> Vec<String> {
    slots.iter().map(Slot::label).collect()
}

/// Drop slots on `day` that start at or before `now`.
///
/// Days other than `now`'s date are returned unchanged, so a past date keeps
/// its slots; the caller decides whether past dates are bookable at all.
pub fn slots_after(slots: Vec<Slot>, day: NaiveDate, now: NaiveDateTime) -> Vec<Slot> {
    if day != now.date() {
        return slots;
    }
    slots
        .into_iter()
        .filter(|slot| slot.starts_at(day) > now)
        .collect()
}
