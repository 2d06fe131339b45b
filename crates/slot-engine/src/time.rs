//! Wall-clock parsing and minute arithmetic.
//!
//! Every computation for a day is done in whole minutes from that day's
//! reference midnight, so comparisons are integer comparisons and no offset or
//! DST adjustment can creep in between two values of the same computation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Result, SlotError};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Minutes from midnight for a time of day, rounded down.
pub fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Minutes from midnight for a time of day, rounded up to the next whole
/// minute when seconds or fractions are present.
pub fn minutes_of_ceil(time: NaiveTime) -> i64 {
    let partial = time.second() > 0 || time.nanosecond() > 0;
    minutes_of(time) + i64::from(partial)
}

/// Minutes from the reference midnight of `day` to `at`, rounded down.
///
/// Negative for instants before `day`, above [`MINUTES_PER_DAY`] for instants
/// after it.
pub fn minutes_since_midnight(day: NaiveDate, at: NaiveDateTime) -> i64 {
    (at.date() - day).num_days() * MINUTES_PER_DAY + minutes_of(at.time())
}

/// Like [`minutes_since_midnight`], rounded up.
///
/// Busy ranges are widened to whole minutes (start down, end up) so a
/// booking ending at 10:00:30 still blocks a 10:00 start.
pub fn minutes_since_midnight_ceil(day: NaiveDate, at: NaiveDateTime) -> i64 {
    (at.date() - day).num_days() * MINUTES_PER_DAY + minutes_of_ceil(at.time())
}

/// Time of day for an offset within the day. `None` once past midnight.
pub fn time_from_minutes(minutes: i64) -> Option<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Parse `"HH:MM"` or `"HH:MM:SS"`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| SlotError::InvalidTime(s.to_string()))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| SlotError::InvalidDate(s.to_string()))
}

/// Parse an ISO 8601 datetime as local wall-clock time.
///
/// Accepts RFC 3339 with an offset (the offset is dropped and the wall-clock
/// reading kept), naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, and the space-separated
/// variant some databases emit.
pub fn parse_local_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| SlotError::InvalidDateTime(s.to_string()))
}

/// `"H:MM"` label as rendered on slot buttons (no leading zero on the hour).
pub fn label(time: NaiveTime) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}

/// Serde adapter for `NaiveTime` as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }

    /// Same format for optional fields; `null` and a missing key both map to `None`.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => crate::time::parse_time(&raw)
                    .map(Some)
                    .map_err(de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

/// Serde adapter for `NaiveDateTime` as ISO 8601 local time.
pub mod iso_local {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_local_datetime(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => crate::time::parse_local_datetime(&raw)
                    .map(Some)
                    .map_err(de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
