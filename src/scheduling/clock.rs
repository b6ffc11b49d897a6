//! Wall-clock parsing and the serde adapters used by the wire types.
//!
//! The client sends times as `HH:MM` or `HH:MM:SS`, dates as `YYYY-MM-DD`
//! and reservation starts as ISO datetimes with or without an offset.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use super::SchedulingError;

pub fn parse_clock(raw: &str) -> Result<Time, SchedulingError> {
    let raw = raw.trim();
    Time::parse(raw, format_description!("[hour]:[minute]:[second]"))
        .or_else(|_| Time::parse(raw, format_description!("[hour]:[minute]")))
        .map_err(|_| SchedulingError::InvalidTime(format!("expected HH:MM, got {:?}", raw)))
}

pub fn parse_date(raw: &str) -> Result<Date, SchedulingError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| SchedulingError::InvalidTime(format!("expected YYYY-MM-DD, got {:?}", raw)))
}

/// Parses a reservation start.
///
/// Datetimes carrying an offset are converted to `offset`; naive ones are
/// read as wall-clock time in `offset`.
pub fn parse_start_time(raw: &str, offset: UtcOffset) -> Result<OffsetDateTime, SchedulingError> {
    let raw = raw.trim();
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return instant
            .checked_to_offset(offset)
            .ok_or_else(|| SchedulingError::InvalidTime(format!("{:?} is out of range", raw)));
    }

    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day]T[hour]:[minute]")))
    .map(|local| local.assume_offset(offset))
    .map_err(|_| SchedulingError::InvalidTime(format!("expected ISO datetime, got {:?}", raw)))
}

pub fn format_hm(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

pub fn format_hms(time: Time) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

/// `HH:MM:SS` on the way out, `HH:MM[:SS]` on the way in.
pub mod hms {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;

    pub fn serialize<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hms(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }

    /// Optional clock value; `null`, a missing field and `""` all mean "none".
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Time;

        pub fn serialize<S: Serializer>(time: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&crate::scheduling::clock::format_hms(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Time>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => crate::scheduling::clock::parse_clock(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }

    /// Patch semantics: a missing field stays `None` (via `#[serde(default)]`),
    /// an explicit `null` becomes `Some(None)`.
    pub mod patch {
        use serde::Deserializer;
        use time::Time;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Option<Time>>, D::Error> {
            super::option::deserialize(deserializer).map(Some)
        }
    }
}

pub mod rfc3339 {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, &Rfc3339).map_err(serde::de::Error::custom)
    }
}
