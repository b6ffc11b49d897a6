use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::app_state::AppState;
use crate::db::{UpdateWeeklyAvailability, WeeklyAvailability, WeeklyAvailabilityList, WeeklySchedule};
use crate::error::{AppError, AppResult};
use crate::modules::extract::ValidatedJson;
use crate::modules::Message;
use crate::scheduling::non_working_days;

fn with_non_working_days(data: Vec<WeeklyAvailability>) -> WeeklyAvailabilityList {
    let non_working_days = non_working_days(data.iter().map(|row| row.weekday));
    WeeklyAvailabilityList { data, non_working_days }
}

/// Weekly table of a professional plus the calendar days they do not work.
pub async fn list_availability(
    State(state): State<AppState>,
    Path(professional_id): Path<i64>,
) -> AppResult<Json<WeeklyAvailabilityList>> {
    let rows = state.store.list_availability(professional_id).await?;
    Ok(Json(with_non_working_days(rows)))
}

pub async fn create_availability(
    State(state): State<AppState>,
    ValidatedJson(schedule): ValidatedJson<WeeklySchedule>,
) -> AppResult<(StatusCode, Json<WeeklyAvailabilityList>)> {
    schedule.validate_windows()?;
    let rows = state
        .store
        .create_availability(schedule.hairdresser, &schedule.availabilities)
        .await?;
    info!(professional_id = schedule.hairdresser, rows = rows.len(), "Availability created");
    Ok((StatusCode::CREATED, Json(with_non_working_days(rows))))
}

/// Replaces the whole weekly table; weekdays left out become non-working.
pub async fn replace_availability(
    State(state): State<AppState>,
    ValidatedJson(schedule): ValidatedJson<WeeklySchedule>,
) -> AppResult<Json<WeeklyAvailabilityList>> {
    schedule.validate_windows()?;
    let rows = state
        .store
        .replace_availability(schedule.hairdresser, &schedule.availabilities)
        .await?;
    info!(professional_id = schedule.hairdresser, rows = rows.len(), "Availability replaced");
    Ok(Json(with_non_working_days(rows)))
}

pub async fn update_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateWeeklyAvailability>,
) -> AppResult<Json<WeeklyAvailability>> {
    let current = state
        .store
        .get_availability(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Availability {id}")))?;
    let updated = patch.apply(&current)?;
    let saved = state.store.update_availability(&updated).await?;
    info!(availability_id = id, "Availability updated");
    Ok(Json(saved))
}

pub async fn remove_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Message>> {
    state.store.delete_availability(id).await?;
    info!(availability_id = id, "Availability removed");
    Ok(Json(Message {
        message: "Availability removed successfully",
    }))
}
