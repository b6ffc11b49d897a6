use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::DatabaseError;
use crate::scheduling::SchedulingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Scheduling(#[from] SchedulingError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

fn database_status(err: &DatabaseError) -> (StatusCode, &'static str) {
    match err {
        DatabaseError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
        DatabaseError::Duplicate => (StatusCode::CONFLICT, "Resource already exists"),
        DatabaseError::Conflict => (StatusCode::CONFLICT, "Resource conflict"),
        DatabaseError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input data"),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred",
        ),
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        self.classify().0
    }

    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(err) => database_status(err),
            AppError::Scheduling(err) => match err {
                SchedulingError::InvalidAvailabilityWindow(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid availability window")
                }
                SchedulingError::InvalidTime(_) => (StatusCode::BAD_REQUEST, "Invalid date or time"),
                SchedulingError::UnknownService { .. } => (StatusCode::NOT_FOUND, "Service not found"),
                SchedulingError::SlotUnavailable => (StatusCode::CONFLICT, "Slot unavailable"),
                SchedulingError::NotCancellable(_) => (StatusCode::CONFLICT, "Reservation cannot be cancelled"),
                SchedulingError::Store(err) => database_status(err),
            },
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.classify();

        // Backend failures get a generic body; the cause only goes to the log
        let details = if status.is_server_error() {
            error!(error = %self, "Request failed");
            error_message.to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": details,
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
