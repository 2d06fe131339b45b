//! # slot-engine
//!
//! Appointment availability for a single-calendar service business.
//!
//! Given a service duration, a calendar day, the business's working hours
//! (with an optional break) and the bookings already made, the engine returns
//! the half-hour grid starts at which the service can be booked without
//! double-booking, leaving opening hours, or cutting into the break.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::{compute_available_slots, slot_labels, Services};
//!
//! let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! // No schedule configured: the 09:00-19:00 fallback applies.
//! let slots = compute_available_slots(day, 60, None, &[], &Services::new()).unwrap();
//! assert_eq!(slot_labels(&slots).first().map(String::as_str), Some("9:00"));
//! assert_eq!(slot_labels(&slots).last().map(String::as_str), Some("18:00"));
//! ```
//!
//! ## Modules
//!
//! - [`slots`] — the engine: grid generation and candidate filtering
//! - [`schedule`] — working hours, break normalization, fallback window
//! - [`appointment`] — existing bookings, statuses, services
//! - [`duration`] — ordered strategies for an appointment's end
//! - [`conflict`] — half-open overlap predicate and conflict lookup
//! - [`repository`] — ports to the data store
//! - [`store`] — in-memory store loadable from a JSON snapshot
//! - [`booking`] — fetch-then-compute and re-checked booking submission
//! - [`time`] — wall-clock parsing and minute arithmetic
//! - [`error`] — error types

pub mod appointment;
pub mod booking;
pub mod conflict;
pub mod duration;
pub mod error;
pub mod repository;
pub mod schedule;
pub mod slots;
pub mod store;
pub mod time;

pub use appointment::{Appointment, AppointmentStatus, Service, Services};
pub use booking::{BookingRequest, BookingService};
pub use conflict::{find_conflicts, overlaps};
pub use duration::{occupied_range, resolve_requested_duration, AppointmentEnd, DEFAULT_DURATION_MINUTES};
pub use error::{Result, SlotError};
pub use repository::{AppointmentRepository, ScheduleRepository, ServiceCatalog};
pub use schedule::{DayOfWeek, WeeklySchedule, WorkingHours};
pub use slots::{compute_available_slots, slot_labels, slots_after, Slot, SLOT_STEP_MINUTES};
pub use store::{InMemoryStore, Snapshot};
