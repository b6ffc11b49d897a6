use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    available_slots, cancel_reservation, create_reservation, list_customer_reservations, professional_agenda,
};
use crate::app_state::AppState;

pub fn reserve_routes() -> Router<AppState> {
    Router::new()
        .route("/slots/{id}", post(available_slots))
        .route("/create", post(create_reservation))
        .route("/list/{id}", get(list_customer_reservations))
        .route("/hairdresser/{id}", get(professional_agenda))
        .route("/cancel/{id}", post(cancel_reservation))
}
