//! Error types for slot-engine operations.
//!
//! Closed days and fully booked days are not errors: the engine returns an
//! empty slot list for them. Only caller mistakes, booking-time rejections and
//! storage failures surface here.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The requested start is not one of the offered slots (outside working
    /// hours, inside the break, or off the grid).
    #[error("No slot is offered at {start}")]
    Unavailable { start: NaiveDateTime },

    /// The requested range overlaps an appointment booked since the slots
    /// were computed.
    #[error("Slot at {start} conflicts with existing appointment(s): {}", .conflicting.join(", "))]
    Conflict {
        start: NaiveDateTime,
        conflicting: Vec<String>,
    },

    /// A new booking reused the id of an existing appointment.
    #[error("Appointment id already in use: {0}")]
    DuplicateId(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
