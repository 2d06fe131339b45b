//! Working-hours configuration and its normalization into a day window.
//!
//! A business configures at most one [`WorkingHours`] record per weekday. A
//! weekday with no record falls back to [`WorkingHours::fallback`] so booking
//! keeps working before the owner has configured anything.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::time::{self, minutes_of, minutes_of_ceil};

/// Opening time used when a weekday has no configured record.
pub const FALLBACK_OPEN: NaiveTime = hm(9, 0);
/// Closing time used when a weekday has no configured record.
pub const FALLBACK_CLOSE: NaiveTime = hm(19, 0);

/// Weekday identifier as stored by the schedule repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opening hours for one weekday, with an optional rest break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub day_of_week: DayOfWeek,
    pub is_working_day: bool,
    #[serde(with = "time::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "time::hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, with = "time::hhmm::option", skip_serializing_if = "Option::is_none")]
    pub break_start_time: Option<NaiveTime>,
    #[serde(default, with = "time::hhmm::option", skip_serializing_if = "Option::is_none")]
    pub break_end_time: Option<NaiveTime>,
}

impl WorkingHours {
    /// The default window for an unconfigured weekday: 09:00–19:00, no break.
    pub fn fallback(day_of_week: DayOfWeek) -> Self {
        Self {
            day_of_week,
            is_working_day: true,
            start_time: FALLBACK_OPEN,
            end_time: FALLBACK_CLOSE,
            break_start_time: None,
            break_end_time: None,
        }
    }

    /// A closed weekday.
    pub fn closed(day_of_week: DayOfWeek) -> Self {
        Self {
            is_working_day: false,
            ..Self::fallback(day_of_week)
        }
    }

    /// The break as a pair, only when both ends are present.
    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.break_start_time.zip(self.break_end_time)
    }

    /// Check the record's invariants.
    ///
    /// The slot engine never calls this: it degrades malformed records to
    /// fewer slots instead. Configuration screens and the CLI use it to report
    /// problems to the owner.
    pub fn validate(&self) -> Result<()> {
        if !self.is_working_day {
            return Ok(());
        }
        if self.start_time >= self.end_time {
            return Err(SlotError::InvalidSchedule(format!(
                "{}: start {} is not before end {}",
                self.day_of_week,
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M"),
            )));
        }
        match (self.break_start_time, self.break_end_time) {
            (None, None) => Ok(()),
            (Some(_), None) | (None, Some(_)) => Err(SlotError::InvalidSchedule(format!(
                "{}: break needs both a start and an end",
                self.day_of_week
            ))),
            (Some(bs), Some(be)) => {
                if bs >= be {
                    return Err(SlotError::InvalidSchedule(format!(
                        "{}: break start {} is not before break end {}",
                        self.day_of_week,
                        bs.format("%H:%M"),
                        be.format("%H:%M"),
                    )));
                }
                if bs < self.start_time || be > self.end_time {
                    return Err(SlotError::InvalidSchedule(format!(
                        "{}: break {}-{} lies outside working hours",
                        self.day_of_week,
                        bs.format("%H:%M"),
                        be.format("%H:%M"),
                    )));
                }
                Ok(())
            }
        }
    }

    /// Normalize into minute offsets for the engine.
    ///
    /// Partial minutes shrink the open window and widen the break. Returns `None` for a closed day and for a window whose start is not
    /// before its end. A break that is half-specified, empty or reversed is
    /// dropped rather than allowed to reject every slot.
    pub fn day_window(&self) -> Option<DayWindow> {
        if !self.is_working_day {
            return None;
        }
        let open = minutes_of_ceil(self.start_time);
        let close = minutes_of(self.end_time);
        if open >= close {
            tracing::warn!(
                day = %self.day_of_week,
                start = %self.start_time,
                end = %self.end_time,
                "working window is empty or reversed; offering no slots"
            );
            return None;
        }

        let rest = match self.break_window() {
            Some((bs, be)) if bs < be => Some((minutes_of(bs), minutes_of_ceil(be))),
            Some((bs, be)) => {
                tracing::debug!(
                    day = %self.day_of_week,
                    break_start = %bs,
                    break_end = %be,
                    "ignoring empty or reversed break"
                );
                None
            }
            None => None,
        };

        Some(DayWindow { open, close, rest })
    }
}

/// A working day reduced to minute offsets from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub open: i64,
    pub close: i64,
    /// Break window `[start, end)`, always non-empty when present.
    pub rest: Option<(i64, i64)>,
}

/// The business's week: zero or one record per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: BTreeMap<DayOfWeek, WorkingHours>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its weekday. Returns the previous one.
    pub fn set(&mut self, hours: WorkingHours) -> Option<WorkingHours> {
        self.days.insert(hours.day_of_week, hours)
    }

    pub fn get(&self, day: DayOfWeek) -> Option<&WorkingHours> {
        self.days.get(&day)
    }

    /// The configured record for `date`'s weekday, if any.
    pub fn for_date(&self, date: NaiveDate) -> Option<&WorkingHours> {
        self.get(DayOfWeek::of(date))
    }

    /// The record for `date`'s weekday, or the fallback window.
    pub fn effective_for(&self, date: NaiveDate) -> WorkingHours {
        let day = DayOfWeek::of(date);
        self.get(day)
            .cloned()
            .unwrap_or_else(|| WorkingHours::fallback(day))
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkingHours> {
        self.days.values()
    }
}

impl FromIterator<WorkingHours> for WeeklySchedule {
    /// Later records for the same weekday replace earlier ones.
    fn from_iter<I: IntoIterator<Item = WorkingHours>>(iter: I) -> Self {
        let mut schedule = Self::new();
        for hours in iter {
            schedule.set(hours);
        }
        schedule
    }
}

const fn hm(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("invalid constant time of day"),
    }
}
