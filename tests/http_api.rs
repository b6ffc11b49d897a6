mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{send, test_app};

const HAIRDRESSER: i64 = 4;

// 2099-06-01 is a Monday
const MONDAY: &str = "2099-06-01";

async fn seed(app: &axum::Router) -> i64 {
    let (status, _) = send(
        app,
        "POST",
        "/api/availability/create",
        Some(json!({
            "hairdresser": HAIRDRESSER,
            "availabilities": [
                {"weekday": "monday", "start_time": "08:00", "end_time": "12:00",
                 "break_start": "10:00", "break_end": "10:30"},
                {"weekday": "wednesday", "start_time": "09:00:00", "end_time": "17:00:00"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, service) = send(
        app,
        "POST",
        "/api/service/create",
        Some(json!({
            "hairdresser": HAIRDRESSER,
            "name": "Corte feminino",
            "price": "45.00",
            "duration": 60
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    service["id"].as_i64().unwrap()
}

fn slots(body: &Value) -> Vec<&str> {
    body["available_slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_store() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["store"], "healthy");
}

#[tokio::test]
async fn availability_list_derives_non_working_days() {
    let app = test_app();
    seed(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/availability/list/{HAIRDRESSER}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["non_working_days"], json!([0, 2, 4, 5, 6]));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["start_time"], "08:00:00");
    assert_eq!(body["data"][0]["break_start"], "10:00:00");
    assert_eq!(body["data"][1]["break_start"], Value::Null);
}

#[tokio::test]
async fn unknown_professional_has_every_day_off() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/availability/list/999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["non_working_days"], json!([0, 1, 2, 3, 4, 5, 6]));
}

#[tokio::test]
async fn invalid_window_is_rejected_and_not_stored() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/availability/create",
        Some(json!({
            "hairdresser": HAIRDRESSER,
            "availabilities": [
                {"weekday": "tuesday", "start_time": "09:00", "end_time": "17:00"},
                {"weekday": "friday", "start_time": "18:00", "end_time": "09:00"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());

    let (_, body) = send(&app, "GET", &format!("/api/availability/list/{HAIRDRESSER}"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn replacing_the_table_drops_missing_weekdays() {
    let app = test_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/availability/update",
        Some(json!({
            "hairdresser": HAIRDRESSER,
            "availabilities": [
                {"weekday": "saturday", "start_time": "10:00", "end_time": "14:00"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["non_working_days"], json!([0, 1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn patching_a_row_revalidates_the_window() {
    let app = test_app();
    seed(&app).await;
    let (_, list) = send(&app, "GET", &format!("/api/availability/list/{HAIRDRESSER}"), None).await;
    let id = list["data"][0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/availability/update/{id}"),
        Some(json!({"end_time": "07:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/availability/update/{id}"),
        Some(json!({"end_time": "13:00", "break_start": null, "break_end": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["end_time"], "13:00:00");
    assert_eq!(body["break_start"], Value::Null);

    let (status, _) = send(&app, "DELETE", &format!("/api/availability/remove/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/availability/remove/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moving_a_row_onto_a_taken_weekday_conflicts() {
    let app = test_app();
    seed(&app).await;
    let list_uri = format!("/api/availability/list/{HAIRDRESSER}");
    let (_, list) = send(&app, "GET", &list_uri, None).await;
    let monday_id = list["data"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/availability/update/{monday_id}"),
        Some(json!({"weekday": "wednesday"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Resource already exists");

    let (_, list) = send(&app, "GET", &list_uri, None).await;
    assert_eq!(list["data"][0]["weekday"], "monday");
    assert_eq!(list["non_working_days"], json!([0, 2, 4, 5, 6]));
}

#[tokio::test]
async fn slots_skip_break_and_confirmed_bookings() {
    let app = test_app();
    let service = seed(&app).await;
    let slots_uri = format!("/api/reserve/slots/{HAIRDRESSER}");

    let (status, body) = send(&app, "POST", &slots_uri, Some(json!({"service": service, "date": MONDAY}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots(&body), ["08:00", "09:00", "11:00"]);

    let (status, reservation) = send(
        &app,
        "POST",
        "/api/reserve/create",
        Some(json!({
            "customer": 11,
            "service": service,
            "hairdresser": HAIRDRESSER,
            "start_time": "2099-06-01T09:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["status"], "confirmed");
    assert_eq!(reservation["start_time"], "2099-06-01T09:00:00-03:00");
    assert_eq!(reservation["end_time"], "2099-06-01T10:00:00-03:00");

    let (_, body) = send(&app, "POST", &slots_uri, Some(json!({"service": service, "date": MONDAY}))).await;
    assert_eq!(slots(&body), ["08:00", "11:00"]);
}

#[tokio::test]
async fn day_without_availability_returns_empty_list() {
    let app = test_app();
    let service = seed(&app).await;
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/reserve/slots/{HAIRDRESSER}"),
        Some(json!({"service": service, "date": "2099-06-07"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(slots(&body).is_empty());
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let app = test_app();
    let service = seed(&app).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/reserve/slots/{HAIRDRESSER}"),
        Some(json!({"service": service, "date": "01/06/2099"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_booking_of_a_slot_conflicts() {
    let app = test_app();
    let service = seed(&app).await;
    let booking = |customer: i64| {
        json!({
            "customer": customer,
            "service": service,
            "hairdresser": HAIRDRESSER,
            "start_time": "2099-06-01T11:00:00-03:00"
        })
    };

    let (status, _) = send(&app, "POST", "/api/reserve/create", Some(booking(11))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/reserve/create", Some(booking(12))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Slot unavailable");
}

#[tokio::test]
async fn booking_inside_the_break_conflicts() {
    let app = test_app();
    let service = seed(&app).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/reserve/create",
        Some(json!({
            "customer": 11,
            "service": service,
            "hairdresser": HAIRDRESSER,
            "start_time": "2099-06-01T13:00:00Z"
        })),
    )
    .await;
    // 13:00Z is 10:00 in the salon, the start of the break
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancelling_frees_the_slot() {
    let app = test_app();
    let service = seed(&app).await;
    let (_, reservation) = send(
        &app,
        "POST",
        "/api/reserve/create",
        Some(json!({
            "customer": 11,
            "service": service,
            "hairdresser": HAIRDRESSER,
            "start_time": "2099-06-01T08:00"
        })),
    )
    .await;
    let id = reservation["id"].as_i64().unwrap();

    let (status, body) = send(&app, "POST", &format!("/api/reserve/cancel/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = send(&app, "POST", &format!("/api/reserve/cancel/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", "/api/reserve/cancel/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/reserve/slots/{HAIRDRESSER}"),
        Some(json!({"service": service, "date": MONDAY})),
    )
    .await;
    assert_eq!(slots(&body), ["08:00", "09:00", "11:00"]);
}

#[tokio::test]
async fn customer_and_agenda_listings() {
    let app = test_app();
    let service = seed(&app).await;
    for (customer, start) in [(11, "2099-06-01T08:00"), (12, "2099-06-01T11:00")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/reserve/create",
            Some(json!({
                "customer": customer,
                "service": service,
                "hairdresser": HAIRDRESSER,
                "start_time": start
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/reserve/list/11", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["customer"], 11);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/reserve/hairdresser/{HAIRDRESSER}?date={MONDAY}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let starts: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["start_time"].as_str().unwrap())
        .collect();
    assert_eq!(starts, ["2099-06-01T08:00:00-03:00", "2099-06-01T11:00:00-03:00"]);
}

#[tokio::test]
async fn service_catalog_crud() {
    let app = test_app();
    let id = seed(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/service/list/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "45.00");
    assert_eq!(body["duration"], 60);
    assert_eq!(body["hairdresser"], HAIRDRESSER);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/service/update/{id}"),
        Some(json!({"price": "50.5", "duration": 45})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "50.50");
    assert_eq!(body["duration"], 45);

    let (_, body) = send(&app, "GET", &format!("/api/service/hairdresser/{HAIRDRESSER}"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/service/remove/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/api/service/list/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_service_bodies_are_rejected() {
    let app = test_app();
    for body in [
        json!({"hairdresser": HAIRDRESSER, "name": "", "price": "10.00", "duration": 30}),
        json!({"hairdresser": HAIRDRESSER, "name": "Barba", "price": "10.00", "duration": 0}),
        json!({"hairdresser": HAIRDRESSER, "name": "Barba", "price": "-1.00", "duration": 30}),
        json!({"hairdresser": HAIRDRESSER, "name": "Barba", "price": "10.001", "duration": 30}),
    ] {
        let (status, _) = send(&app, "POST", "/api/service/create", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn booking_with_a_foreign_service_is_not_found() {
    let app = test_app();
    seed(&app).await;
    let (_, other) = send(
        &app,
        "POST",
        "/api/service/create",
        Some(json!({"hairdresser": 77, "name": "Barba", "price": 20, "duration": 30})),
    )
    .await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/reserve/create",
        Some(json!({
            "customer": 11,
            "service": other["id"],
            "hairdresser": HAIRDRESSER,
            "start_time": "2099-06-01T08:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_cannot_be_in_two_chairs_at_once() {
    let app = test_app();
    let service = seed(&app).await;
    let other = HAIRDRESSER + 1;
    let (status, _) = send(
        &app,
        "POST",
        "/api/availability/create",
        Some(json!({
            "hairdresser": other,
            "availabilities": [{"weekday": "monday", "start_time": "08:00", "end_time": "12:00"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, created) = send(
        &app,
        "POST",
        "/api/service/create",
        Some(json!({"hairdresser": other, "name": "Escova", "price": "30.00", "duration": 60})),
    )
    .await;
    let other_service = created["id"].as_i64().unwrap();

    let booking = |customer: i64, hairdresser: i64, service: i64| {
        json!({
            "customer": customer,
            "service": service,
            "hairdresser": hairdresser,
            "start_time": "2099-06-01T09:00:00"
        })
    };
    let (status, _) = send(&app, "POST", "/api/reserve/create", Some(booking(11, HAIRDRESSER, service))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/reserve/create", Some(booking(11, other, other_service))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Slot unavailable");

    let (status, _) = send(&app, "POST", "/api/reserve/create", Some(booking(12, other, other_service))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn dates_at_the_end_of_the_calendar_are_bad_requests() {
    let app = test_app();
    let service = seed(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/reserve/hairdresser/{HAIRDRESSER}?date=9999-12-31"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid date or time");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/reserve/slots/{HAIRDRESSER}"),
        Some(json!({"service": service, "date": "9999-12-31"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reserve/create",
        Some(json!({
            "customer": 11,
            "service": service,
            "hairdresser": HAIRDRESSER,
            "start_time": "9999-12-31T23:30:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid date or time");
}
