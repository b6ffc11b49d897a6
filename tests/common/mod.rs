use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use salon_backend::{app::create_router, app_state::AppState, config::Config, db::MemoryStore};

/// Router over an empty in-memory store, salon clock at UTC-3.
pub fn test_app() -> Router {
    let vars: HashMap<&str, &str> = HashMap::from([("BOOKING_UTC_OFFSET", "-03:00"), ("STORE_BACKEND", "memory")]);
    let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    create_router(AppState::new(Arc::new(MemoryStore::new()), config))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
