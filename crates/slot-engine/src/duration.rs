//! Resolve how long an existing appointment occupies the calendar.
//!
//! Rows written by older versions of the booking form may lack an explicit
//! end. The occupied range is resolved by trying [`AppointmentEnd`] strategies
//! in [`RESOLUTION_ORDER`]; the first one that yields an end after the start
//! wins. The last strategy always succeeds.

use chrono::{Duration, NaiveDateTime};

use crate::appointment::Appointment;
use crate::error::{Result, SlotError};
use crate::repository::ServiceCatalog;

/// Length assumed when nothing else is known, and the default requested
/// duration when the caller cannot name a service.
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// One way of deriving an appointment's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentEnd {
    /// The stored `end_datetime`.
    ExplicitEnd,
    /// `start + actual_duration_minutes`.
    ActualDuration,
    /// `start + ` the duration of the booked service in the catalog.
    ServiceDuration,
    /// `start + DEFAULT_DURATION_MINUTES`.
    Default,
}

pub const RESOLUTION_ORDER: [AppointmentEnd; 4] = [
    AppointmentEnd::ExplicitEnd,
    AppointmentEnd::ActualDuration,
    AppointmentEnd::ServiceDuration,
    AppointmentEnd::Default,
];

impl AppointmentEnd {
    /// The end this strategy yields, or `None` if its data is missing or
    /// would not put the end after the start.
    pub fn resolve<C: ServiceCatalog + ?Sized>(
        self,
        appointment: &Appointment,
        services: &C,
    ) -> Option<NaiveDateTime> {
        let start = appointment.start_datetime;
        let end = match self {
            AppointmentEnd::ExplicitEnd => appointment.end_datetime?,
            AppointmentEnd::ActualDuration => {
                start.checked_add_signed(minutes(appointment.actual_duration_minutes?)?)?
            }
            AppointmentEnd::ServiceDuration => {
                let id = appointment.service_id.as_deref()?;
                start.checked_add_signed(minutes(services.service_duration(id)?)?)?
            }
            AppointmentEnd::Default => start + Duration::minutes(DEFAULT_DURATION_MINUTES),
        };
        (end > start).then_some(end)
    }
}

fn minutes(m: i64) -> Option<Duration> {
    if m > 0 {
        Duration::try_minutes(m)
    } else {
        None
    }
}

/// The `[start, end)` range an appointment occupies, and which strategy
/// produced the end.
pub fn occupied_range<C: ServiceCatalog + ?Sized>(
    appointment: &Appointment,
    services: &C,
) -> (NaiveDateTime, NaiveDateTime, AppointmentEnd) {
    for strategy in RESOLUTION_ORDER {
        if let Some(end) = strategy.resolve(appointment, services) {
            return (appointment.start_datetime, end, strategy);
        }
    }
    // Default always resolves; keep the compiler satisfied without panicking.
    let start = appointment.start_datetime;
    (
        start,
        start + Duration::minutes(DEFAULT_DURATION_MINUTES),
        AppointmentEnd::Default,
    )
}

/// The duration to book: the caller's value if it has one, else 30 minutes.
///
/// A supplied value that is zero or negative is a caller error.
pub fn resolve_requested_duration(requested: Option<i64>) -> Result<i64> {
    match requested {
        None => Ok(DEFAULT_DURATION_MINUTES),
        Some(m) if m > 0 => Ok(m),
        Some(m) => Err(SlotError::InvalidDuration(m)),
    }
}
