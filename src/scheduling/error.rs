use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("Invalid availability window: {0}")]
    InvalidAvailabilityWindow(String),

    #[error("The requested slot is no longer available")]
    SlotUnavailable,

    #[error("Service {service_id} is not offered by professional {professional_id}")]
    UnknownService { service_id: i64, professional_id: i64 },

    #[error("Invalid date or time: {0}")]
    InvalidTime(String),

    #[error("Reservation {0} can no longer be cancelled")]
    NotCancellable(i64),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl From<sqlx::Error> for SchedulingError {
    fn from(err: sqlx::Error) -> Self {
        SchedulingError::Store(DatabaseError::from(err))
    }
}
