//! In-memory implementation of the repository ports.
//!
//! Loads from and saves to a JSON snapshot:
//!
//! ```json
//! {
//!   "schedule": [{"day_of_week": "monday", "is_working_day": true,
//!                 "start_time": "09:00", "end_time": "19:00",
//!                 "break_start_time": "13:00", "break_end_time": "14:00"}],
//!   "services": [{"id": "cut", "duration_minutes": 45}],
//!   "appointments": [{"id": "a1", "start_datetime": "2026-03-16T10:00:00",
//!                     "service_id": "cut", "status": "confirmed"}]
//! }
//! ```

use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, Service, Services};
use crate::error::{Result, SlotError};
use crate::repository::{AppointmentRepository, ScheduleRepository, ServiceCatalog};
use crate::schedule::{DayOfWeek, WeeklySchedule, WorkingHours};

/// Serialized form of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub schedule: Vec<WorkingHours>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlotError::Storage(format!("invalid snapshot: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::Storage(e.to_string()))
    }
}

/// Thread-safe store backed by plain collections.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    schedule: WeeklySchedule,
    services: Services,
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryStore {
    pub fn new(schedule: WeeklySchedule, services: Services, appointments: Vec<Appointment>) -> Self {
        Self {
            schedule,
            services,
            appointments: RwLock::new(appointments),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::new(
            snapshot.schedule.into_iter().collect(),
            snapshot.services.into_iter().collect(),
            snapshot.appointments,
        )
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Snapshot::from_json(json).map(Self::from_snapshot)
    }

    /// Current contents. Schedule is ordered by weekday, services by id.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut services: Vec<Service> = self.services.iter().cloned().collect();
        services.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Snapshot {
            schedule: self.schedule.iter().cloned().collect(),
            services,
            appointments: self.read()?.clone(),
        })
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Appointment>>> {
        self.appointments
            .read()
            .map_err(|_| SlotError::Storage("appointment lock poisoned".to_string()))
    }
}

impl ScheduleRepository for InMemoryStore {
    fn working_hours(&self, day: DayOfWeek) -> Result<Option<WorkingHours>> {
        self.schedule.working_hours(day)
    }
}

impl AppointmentRepository for InMemoryStore {
    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        Ok(self
            .read()?
            .iter()
            .filter(|a| a.starts_on(date))
            .cloned()
            .collect())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.read()?.iter().any(|a| a.id.as_deref() == Some(id)))
    }

    fn save(&self, appointment: Appointment) -> Result<()> {
        let mut guard = self
            .appointments
            .write()
            .map_err(|_| SlotError::Storage("appointment lock poisoned".to_string()))?;
        match appointment
            .id
            .as_ref()
            .and_then(|id| guard.iter().position(|a| a.id.as_ref() == Some(id)))
        {
            Some(index) => guard[index] = appointment,
            None => guard.push(appointment),
        }
        Ok(())
    }
}

impl ServiceCatalog for InMemoryStore {
    fn service_duration(&self, service_id: &str) -> Option<i64> {
        self.services.service_duration(service_id)
    }
}
