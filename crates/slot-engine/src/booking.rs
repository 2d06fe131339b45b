//! Caller side of the engine: gather inputs, offer slots, accept bookings.
//!
//! Nothing is cached between calls. Every query re-reads the schedule and the
//! day's appointments, and [`BookingService::book`] re-checks against a fresh
//! read before saving. Two customers can still be shown the same slot; the
//! second submission is rejected with [`SlotError::Conflict`]. There is no
//! hold or reservation in between.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, AppointmentStatus};
use crate::conflict::{find_conflicts, range_end};
use crate::duration::resolve_requested_duration;
use crate::error::{Result, SlotError};
use crate::repository::{AppointmentRepository, ScheduleRepository, ServiceCatalog};
use crate::schedule::DayOfWeek;
use crate::slots::{compute_available_slots, slots_after, Slot};

/// A customer's chosen slot, as submitted by the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(with = "crate::time::iso_local")]
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    #[serde(default)]
    pub service_id: Option<String>,
}

pub struct BookingService<S, A, C> {
    schedule: S,
    appointments: A,
    services: C,
}

impl<S, A, C> BookingService<S, A, C>
where
    S: ScheduleRepository,
    A: AppointmentRepository,
    C: ServiceCatalog,
{
    pub fn new(schedule: S, appointments: A, services: C) -> Self {
        Self {
            schedule,
            appointments,
            services,
        }
    }

    /// Duration of the service being booked, or the 30-minute default when
    /// no service is given or the catalog does not know it.
    pub fn requested_duration(&self, service_id: Option<&str>) -> Result<i64> {
        let known = service_id.and_then(|id| self.services.service_duration(id));
        if known.is_none() {
            if let Some(id) = service_id {
                tracing::debug!(service_id = id, "unknown service; using default duration");
            }
        }
        resolve_requested_duration(known)
    }

    /// Slots for `date` computed from a fresh read of the store.
    pub fn available_slots(&self, date: NaiveDate, duration_minutes: i64) -> Result<Vec<Slot>> {
        let hours = self.schedule.working_hours(DayOfWeek::of(date))?;
        let appointments = self.appointments.appointments_on(date)?;
        compute_available_slots(
            date,
            duration_minutes,
            hours.as_ref(),
            &appointments,
            &self.services,
        )
    }

    /// Like [`available_slots`](Self::available_slots), minus slots that have
    /// already started when `date` is today.
    pub fn available_slots_after(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<Slot>> {
        Ok(slots_after(
            self.available_slots(date, duration_minutes)?,
            date,
            now,
        ))
    }

    /// Validate `request` against the latest data and save it.
    ///
    /// # Errors
    /// - `SlotError::InvalidDuration` for a non-positive duration.
    /// - `SlotError::DuplicateId` if `request.id` already names an appointment.
    /// - `SlotError::Conflict` if the range overlaps a non-cancelled booking.
    /// - `SlotError::Unavailable` if the start is not an offered slot
    ///   (outside hours, in the break, off the grid, or a closed day), or
    ///   if the requested end is not representable.
    /// - `SlotError::Storage` if the repository fails.
    pub fn book(&self, request: BookingRequest) -> Result<Appointment> {
        if request.duration_minutes <= 0 {
            return Err(SlotError::InvalidDuration(request.duration_minutes));
        }
        let Some(end) = range_end(request.start, request.duration_minutes) else {
            tracing::info!(start = %request.start, "booking rejected: end out of range");
            return Err(SlotError::Unavailable {
                start: request.start,
            });
        };
        if let Some(id) = request.id.as_deref() {
            if self.appointments.exists(id)? {
                tracing::info!(id, "booking rejected: id already in use");
                return Err(SlotError::DuplicateId(id.to_string()));
            }
        }

        let date = request.start.date();
        let existing = self.appointments.appointments_on(date)?;

        let conflicts = find_conflicts(
            request.start,
            request.duration_minutes,
            &existing,
            &self.services,
        );
        if !conflicts.is_empty() {
            let conflicting: Vec<String> = conflicts
                .iter()
                .map(|a| a.id.clone().unwrap_or_else(|| a.start_datetime.to_string()))
                .collect();
            tracing::info!(start = %request.start, ?conflicting, "booking rejected: slot taken");
            return Err(SlotError::Conflict {
                start: request.start,
                conflicting,
            });
        }

        let hours = self.schedule.working_hours(DayOfWeek::of(date))?;
        let offered = compute_available_slots(
            date,
            request.duration_minutes,
            hours.as_ref(),
            &existing,
            &self.services,
        )?;
        if !offered.iter().any(|slot| slot.starts_at(date) == request.start) {
            tracing::info!(start = %request.start, "booking rejected: not an offered slot");
            return Err(SlotError::Unavailable {
                start: request.start,
            });
        }

        let appointment = Appointment {
            id: request.id,
            start_datetime: request.start,
            end_datetime: Some(end),
            actual_duration_minutes: Some(request.duration_minutes),
            service_id: request.service_id,
            status: AppointmentStatus::Pending,
        };
        self.appointments.save(appointment.clone())?;
        tracing::info!(start = %appointment.start_datetime, "booking saved");
        Ok(appointment)
    }
}
