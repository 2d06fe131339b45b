//! Half-open overlap checks between a proposed booking and existing ones.
//!
//! Two ranges `[a_start, a_end)` and `[b_start, b_end)` overlap iff
//! `a_start < b_end && a_end > b_start`. Back-to-back bookings, where one ends
//! exactly when the next starts, are NOT conflicts.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::appointment::Appointment;
use crate::duration::occupied_range;
use crate::repository::ServiceCatalog;
use crate::time::{minutes_since_midnight, minutes_since_midnight_ceil};

/// The single overlap predicate used by the engine and the booking re-check.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && a_end > b_start
}

/// Occupied ranges of the blocking appointments that start on `day`, as minute
/// offsets from `day`'s midnight. Partial minutes widen the range: the start
/// rounds down and the end rounds up.
///
/// Cancelled appointments and appointments starting on other days are left
/// out. The result is sorted by start.
pub fn occupied_intervals<C: ServiceCatalog + ?Sized>(
    day: NaiveDate,
    appointments: &[Appointment],
    services: &C,
) -> Vec<(i64, i64)> {
    let mut intervals: Vec<(i64, i64)> = appointments
        .iter()
        .filter(|a| a.starts_on(day) && a.blocks_time())
        .map(|a| {
            let (start, end, _) = occupied_range(a, services);
            (
                minutes_since_midnight(day, start),
                minutes_since_midnight_ceil(day, end),
            )
        })
        .collect();
    intervals.sort_unstable();
    intervals
}

/// `start + duration_minutes`, or `None` if it leaves chrono's range.
pub fn range_end(start: NaiveDateTime, duration_minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(duration_minutes).and_then(|d| start.checked_add_signed(d))
}

/// Every blocking appointment whose occupied range overlaps
/// `[start, start + duration_minutes)`.
///
/// A range whose end is not representable runs to `NaiveDateTime::MAX`.
pub fn find_conflicts<'a, C: ServiceCatalog + ?Sized>(
    start: NaiveDateTime,
    duration_minutes: i64,
    appointments: &'a [Appointment],
    services: &C,
) -> Vec<&'a Appointment> {
    let end = range_end(start, duration_minutes).unwrap_or(NaiveDateTime::MAX);
    appointments
        .iter()
        .filter(|a| a.blocks_time())
        .filter(|a| {
            let (busy_start, busy_end, _) = occupied_range(*a, services);
            overlaps(start, end, busy_start, busy_end)
        })
        .collect()
}
