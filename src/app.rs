use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::timeout::TimeoutLayer;

use crate::{app_state::AppState, middleware::tracing::observability_middleware, modules::api_routes};

pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.env.server.request_timeout;

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(observability_middleware))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Salon backend says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let store_status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::info!("Store health check failed: {}", e);
            "unhealthy"
        }
    };

    // Get telemetry health status
    let telemetry_health = crate::telemetry::telemetry_health_check();

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "store": store_status,
            "telemetry": telemetry_health
        }
    }))
}
