//! Existing bookings and the services they were booked for.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Whether an appointment in this state occupies its time range.
    ///
    /// Only cancellation frees the slot; a no-show or a completed visit still
    /// held the chair at that time.
    pub fn blocks_time(self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

/// A booking as returned by the appointment repository.
///
/// Historical rows may lack `end_datetime`; see [`crate::duration`] for how
/// the occupied range is derived then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(with = "time::iso_local")]
    pub start_datetime: NaiveDateTime,
    #[serde(default, with = "time::iso_local::option", skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// A pending appointment with only a start time.
    pub fn starting_at(start_datetime: NaiveDateTime) -> Self {
        Self {
            id: None,
            start_datetime,
            end_datetime: None,
            actual_duration_minutes: None,
            service_id: None,
            status: AppointmentStatus::Pending,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end_datetime = Some(end);
        self
    }

    pub fn with_actual_duration(mut self, minutes: i64) -> Self {
        self.actual_duration_minutes = Some(minutes);
        self
    }

    pub fn with_service(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// True if the appointment starts on `day` (local wall clock).
    pub fn starts_on(&self, day: NaiveDate) -> bool {
        self.start_datetime.date() == day
    }

    /// True if the appointment takes part in conflict checks.
    pub fn blocks_time(&self) -> bool {
        self.status.blocks_time()
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} at {}", id, self.start_datetime),
            None => write!(f, "appointment at {}", self.start_datetime),
        }
    }
}

/// A bookable service (or promotion) and its nominal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub duration_minutes: i64,
}

/// Services indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Services {
    by_id: HashMap<String, Service>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, service: Service) -> Option<Service> {
        self.by_id.insert(service.id.clone(), service)
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.by_id.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.by_id.values()
    }
}

impl FromIterator<Service> for Services {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        let mut services = Self::new();
        for service in iter {
            services.insert(service);
        }
        services
    }
}
