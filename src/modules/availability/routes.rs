use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    create_availability, list_availability, remove_availability, replace_availability, update_availability,
};
use crate::app_state::AppState;

pub fn availability_routes() -> Router<AppState> {
    Router::new()
        .route("/list/{id}", get(list_availability))
        .route("/create", post(create_availability))
        .route("/update", post(replace_availability))
        .route("/update/{id}", put(update_availability))
        .route("/remove/{id}", delete(remove_availability))
}
