use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{create_service, get_service, list_professional_services, remove_service, update_service};
use crate::app_state::AppState;

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_service))
        .route("/list/{id}", get(get_service))
        .route("/hairdresser/{id}", get(list_professional_services))
        .route("/update/{id}", put(update_service))
        .route("/remove/{id}", delete(remove_service))
}
