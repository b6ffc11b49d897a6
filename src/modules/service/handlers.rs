use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::app_state::AppState;
use crate::db::{NewService, Service, UpdateService};
use crate::error::{AppError, AppResult};
use crate::modules::extract::ValidatedJson;
use crate::modules::{DataList, Message};

pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(new_service): ValidatedJson<NewService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let service = state.store.create_service(&new_service).await?;
    info!(
        service_id = service.id,
        professional_id = service.professional_id,
        "Service created"
    );
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn get_service(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Service>> {
    state
        .store
        .get_service(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Service {id}")))
}

pub async fn list_professional_services(
    State(state): State<AppState>,
    Path(professional_id): Path<i64>,
) -> AppResult<Json<DataList<Service>>> {
    let data = state.store.list_services(Some(professional_id)).await?;
    Ok(Json(DataList { data }))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateService>,
) -> AppResult<Json<Service>> {
    let current = state
        .store
        .get_service(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service {id}")))?;
    let saved = state.store.update_service(&patch.apply(&current)).await?;
    info!(service_id = id, "Service updated");
    Ok(Json(saved))
}

/// A service that still has reservations is kept; the store reports a conflict.
pub async fn remove_service(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Message>> {
    state.store.delete_service(id).await?;
    info!(service_id = id, "Service removed");
    Ok(Json(Message {
        message: "Service removed successfully",
    }))
}
