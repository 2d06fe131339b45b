//! Ports to the data store that owns schedules, services and appointments.
//!
//! The engine itself never calls these; [`crate::booking::BookingService`]
//! gathers inputs through them and hands the engine plain values.

use chrono::NaiveDate;

use crate::appointment::{Appointment, Services};
use crate::error::Result;
use crate::schedule::{DayOfWeek, WeeklySchedule, WorkingHours};

pub trait ScheduleRepository {
    /// The configured record for `day`, or `None` if the owner never set one.
    fn working_hours(&self, day: DayOfWeek) -> Result<Option<WorkingHours>>;
}

pub trait AppointmentRepository {
    /// Appointments whose start falls on `date`, in any status.
    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>>;

    /// Whether any appointment, on any day and in any status, has this id.
    fn exists(&self, id: &str) -> Result<bool>;

    /// Insert, or replace the appointment with the same id.
    fn save(&self, appointment: Appointment) -> Result<()>;
}

/// Duration lookup for the end-time fallback chain.
pub trait ServiceCatalog {
    fn service_duration(&self, service_id: &str) -> Option<i64>;
}

impl ServiceCatalog for Services {
    fn service_duration(&self, service_id: &str) -> Option<i64> {
        self.get(service_id).map(|s| s.duration_minutes)
    }
}

impl ScheduleRepository for WeeklySchedule {
    fn working_hours(&self, day: DayOfWeek) -> Result<Option<WorkingHours>> {
        Ok(self.get(day).cloned())
    }
}

impl<T: ServiceCatalog + ?Sized> ServiceCatalog for &T {
    fn service_duration(&self, service_id: &str) -> Option<i64> {
        (**self).service_duration(service_id)
    }
}

impl<T: ScheduleRepository + ?Sized> ScheduleRepository for &T {
    fn working_hours(&self, day: DayOfWeek) -> Result<Option<WorkingHours>> {
        (**self).working_hours(day)
    }
}

impl<T: AppointmentRepository + ?Sized> AppointmentRepository for &T {
    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        (**self).appointments_on(date)
    }

    fn exists(&self, id: &str) -> Result<bool> {
        (**self).exists(id)
    }

    fn save(&self, appointment: Appointment) -> Result<()> {
        (**self).save(appointment)
    }
}
