use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use time::OffsetDateTime;

use crate::app_state::AppState;
use crate::db::{AgendaQuery, AvailableSlots, NewReservation, ReservationView, SlotRequest};
use crate::error::AppResult;
use crate::modules::extract::ValidatedJson;
use crate::modules::DataList;
use crate::scheduling::clock::{format_hm, parse_date, parse_start_time};
use crate::scheduling::{BookingRequest, SlotQuery};

/// Open `HH:MM` starts for a service on one date.
pub async fn available_slots(
    State(state): State<AppState>,
    Path(professional_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<SlotRequest>,
) -> AppResult<Json<AvailableSlots>> {
    let query = SlotQuery {
        professional_id,
        service_id: request.service,
        date: parse_date(&request.date)?,
    };
    let slots = state
        .committer
        .available_slots(query, OffsetDateTime::now_utc())
        .await?;

    Ok(Json(AvailableSlots {
        available_slots: slots.into_iter().map(format_hm).collect(),
    }))
}

/// Books a slot. A slot taken in the meantime answers 409 and the client
/// has to fetch the slot list again.
pub async fn create_reservation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewReservation>,
) -> AppResult<(StatusCode, Json<ReservationView>)> {
    let start_time = parse_start_time(&request.start_time, state.committer.policy().utc_offset)?;
    let now = OffsetDateTime::now_utc();
    let reservation = state
        .committer
        .commit(
            BookingRequest {
                professional_id: request.hairdresser,
                service_id: request.service,
                customer_id: request.customer,
                start_time,
            },
            now,
        )
        .await?;

    let view = reservation.view_at(now, state.committer.policy().utc_offset);
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_customer_reservations(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> AppResult<Json<DataList<ReservationView>>> {
    let now = OffsetDateTime::now_utc();
    let offset = state.committer.policy().utc_offset;
    let data = state
        .store
        .reservations_for_customer(customer_id)
        .await?
        .iter()
        .map(|reservation| reservation.view_at(now, offset))
        .collect();
    Ok(Json(DataList { data }))
}

/// Day view of a professional, today in the salon's offset when no date is given.
pub async fn professional_agenda(
    State(state): State<AppState>,
    Path(professional_id): Path<i64>,
    Query(query): Query<AgendaQuery>,
) -> AppResult<Json<DataList<ReservationView>>> {
    let policy = state.committer.policy();
    let now = OffsetDateTime::now_utc();
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => now.to_offset(policy.utc_offset).date(),
    };
    let (from, to) = policy.day_bounds(date)?;
    let data = state
        .store
        .reservations_between(professional_id, from, to)
        .await?
        .iter()
        .map(|reservation| reservation.view_at(now, policy.utc_offset))
        .collect();
    Ok(Json(DataList { data }))
}

pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReservationView>> {
    let now = OffsetDateTime::now_utc();
    let cancelled = state.committer.cancel(id, now).await?;
    Ok(Json(cancelled.view_at(now, state.committer.policy().utc_offset)))
}
