pub mod availability;
pub mod extract;
pub mod reserve;
pub mod service;

use axum::Router;
use serde::Serialize;

use crate::app_state::AppState;

/// `{data: [...]}` envelope used by every list endpoint.
#[derive(Debug, Serialize)]
pub struct DataList<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// All JSON endpoints, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/availability", availability::routes::availability_routes())
        .nest("/service", service::routes::service_routes())
        .nest("/reserve", reserve::routes::reserve_routes())
}
