use time::Time;

use super::slots::{seconds_of_day, DaySpan};
use super::SchedulingError;

/// A validated daily opening window with an optional break.
///
/// Invariant: `start < end` and, with a break,
/// `start <= break_start < break_end <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenHours {
    start: Time,
    end: Time,
    pause: Option<(Time, Time)>,
}

impl OpenHours {
    pub fn new(
        start: Time,
        end: Time,
        break_start: Option<Time>,
        break_end: Option<Time>,
    ) -> Result<Self, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::InvalidAvailabilityWindow(format!(
                "start_time {} must be before end_time {}",
                start, end
            )));
        }

        let pause = match (break_start, break_end) {
            (None, None) => None,
            (Some(break_start), Some(break_end)) => {
                if break_start >= break_end {
                    return Err(SchedulingError::InvalidAvailabilityWindow(format!(
                        "break_start {} must be before break_end {}",
                        break_start, break_end
                    )));
                }
                if break_start < start || break_end > end {
                    return Err(SchedulingError::InvalidAvailabilityWindow(format!(
                        "break {}-{} must lie within {}-{}",
                        break_start, break_end, start, end
                    )));
                }
                Some((break_start, break_end))
            }
            _ => {
                return Err(SchedulingError::InvalidAvailabilityWindow(
                    "break_start and break_end must be given together".to_string(),
                ))
            }
        };

        Ok(Self { start, end, pause })
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn end(&self) -> Time {
        self.end
    }

    pub fn span(&self) -> DaySpan {
        DaySpan::new(seconds_of_day(self.start), seconds_of_day(self.end))
    }

    pub fn pause(&self) -> Option<DaySpan> {
        self.pause
            .map(|(from, to)| DaySpan::new(seconds_of_day(from), seconds_of_day(to)))
    }
}
