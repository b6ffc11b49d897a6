use serde::{Deserialize, Serialize};
use time::Time;
use validator::Validate;

use crate::scheduling::{clock, OpenHours, SchedulingError, Weekday};

/// One recurring opening rule of a professional. At most one per weekday.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub id: i64,
    #[serde(rename = "hairdresser")]
    pub professional_id: i64,
    pub weekday: Weekday,
    #[serde(with = "clock::hms")]
    pub start_time: Time,
    #[serde(with = "clock::hms")]
    pub end_time: Time,
    #[serde(default, with = "clock::hms::option")]
    pub break_start: Option<Time>,
    #[serde(default, with = "clock::hms::option")]
    pub break_end: Option<Time>,
}

impl WeeklyAvailability {
    pub fn open_hours(&self) -> Result<OpenHours, SchedulingError> {
        OpenHours::new(self.start_time, self.end_time, self.break_start, self.break_end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWeeklyAvailability {
    pub weekday: Weekday,
    #[serde(with = "clock::hms")]
    pub start_time: Time,
    #[serde(with = "clock::hms")]
    pub end_time: Time,
    #[serde(default, with = "clock::hms::option")]
    pub break_start: Option<Time>,
    #[serde(default, with = "clock::hms::option")]
    pub break_end: Option<Time>,
}

impl NewWeeklyAvailability {
    pub fn open_hours(&self) -> Result<OpenHours, SchedulingError> {
        OpenHours::new(self.start_time, self.end_time, self.break_start, self.break_end)
    }

    pub fn into_row(self, id: i64, professional_id: i64) -> WeeklyAvailability {
        WeeklyAvailability {
            id,
            professional_id,
            weekday: self.weekday,
            start_time: self.start_time,
            end_time: self.end_time,
            break_start: self.break_start,
            break_end: self.break_end,
        }
    }
}

/// Body of the create/update endpoints: the whole weekly table of one professional.
#[derive(Debug, Deserialize, Validate)]
pub struct WeeklySchedule {
    #[validate(range(min = 1, message = "hairdresser must be a valid id"))]
    pub hairdresser: i64,
    #[validate(length(max = 7, message = "at most one row per weekday"))]
    pub availabilities: Vec<NewWeeklyAvailability>,
}

impl WeeklySchedule {
    /// Checks every window and that no weekday appears twice.
    pub fn validate_windows(&self) -> Result<(), SchedulingError> {
        let mut seen = Vec::with_capacity(self.availabilities.len());
        for row in &self.availabilities {
            if seen.contains(&row.weekday) {
                return Err(SchedulingError::InvalidAvailabilityWindow(format!(
                    "{} is listed more than once",
                    row.weekday
                )));
            }
            seen.push(row.weekday);
            row.open_hours()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateWeeklyAvailability {
    pub weekday: Option<Weekday>,
    #[serde(default, with = "clock::hms::option")]
    pub start_time: Option<Time>,
    #[serde(default, with = "clock::hms::option")]
    pub end_time: Option<Time>,
    #[serde(default, deserialize_with = "clock::hms::patch::deserialize")]
    pub break_start: Option<Option<Time>>,
    #[serde(default, deserialize_with = "clock::hms::patch::deserialize")]
    pub break_end: Option<Option<Time>>,
}

impl UpdateWeeklyAvailability {
    /// Returns `current` with the provided fields replaced; the window is
    /// re-validated as a whole.
    pub fn apply(&self, current: &WeeklyAvailability) -> Result<WeeklyAvailability, SchedulingError> {
        let updated = WeeklyAvailability {
            id: current.id,
            professional_id: current.professional_id,
            weekday: self.weekday.unwrap_or(current.weekday),
            start_time: self.start_time.unwrap_or(current.start_time),
            end_time: self.end_time.unwrap_or(current.end_time),
            break_start: self.break_start.unwrap_or(current.break_start),
            break_end: self.break_end.unwrap_or(current.break_end),
        };
        updated.open_hours()?;
        Ok(updated)
    }
}

#[derive(Debug, Serialize)]
pub struct WeeklyAvailabilityList {
    pub data: Vec<WeeklyAvailability>,
    pub non_working_days: Vec<u8>,
}
