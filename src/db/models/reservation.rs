use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};
use validator::Validate;

use crate::scheduling::{clock, Weekday};

/// Stored lifecycle of a reservation. `completed` is never stored, see
/// [`Reservation::state_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationState {
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub professional_id: i64,
    pub service_id: i64,
    pub customer_id: i64,
    #[serde(with = "clock::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "clock::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: ReservationStatus,
    #[serde(with = "clock::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Reservation {
    /// Confirmed reservations that already ended count as completed.
    pub fn state_at(&self, now: OffsetDateTime) -> ReservationState {
        match self.status {
            ReservationStatus::Cancelled => ReservationState::Cancelled,
            ReservationStatus::Confirmed if self.end_time < now => ReservationState::Completed,
            ReservationStatus::Confirmed => ReservationState::Confirmed,
        }
    }

    pub fn blocks_slots(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    /// Client view with every timestamp on the salon's `offset`, whatever
    /// offset the store handed back.
    pub fn view_at(&self, now: OffsetDateTime, offset: UtcOffset) -> ReservationView {
        let local = |instant: OffsetDateTime| instant.checked_to_offset(offset).unwrap_or(instant);
        ReservationView {
            id: self.id,
            hairdresser: self.professional_id,
            service: self.service_id,
            customer: self.customer_id,
            start_time: local(self.start_time),
            end_time: local(self.end_time),
            status: self.state_at(now),
            created_at: local(self.created_at),
        }
    }
}

/// Reservation as returned to the client, carrying the effective state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationView {
    pub id: i64,
    pub hairdresser: i64,
    pub service: i64,
    pub customer: i64,
    #[serde(with = "clock::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "clock::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: ReservationState,
    #[serde(with = "clock::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated booking waiting to be written. The day bounds and weekday
/// are in the salon's offset and tell the store which rows to re-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub professional_id: i64,
    pub service_id: i64,
    pub customer_id: i64,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub weekday: Weekday,
    pub day_start: OffsetDateTime,
    pub day_end: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewReservation {
    #[validate(range(min = 1, message = "customer must be a valid id"))]
    pub customer: i64,
    #[validate(range(min = 1, message = "service must be a valid id"))]
    pub service: i64,
    #[validate(range(min = 1, message = "hairdresser must be a valid id"))]
    pub hairdresser: i64,
    #[validate(length(min = 1, message = "start_time is required"))]
    pub start_time: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SlotRequest {
    #[validate(range(min = 1, message = "service must be a valid id"))]
    pub service: i64,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub available_slots: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
}
