mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

fn delivery_payload(pickup_time: &str) -> Value {
    json!({
        "pickup_address": "Port of Colombo",
        "pickup_latitude": 6.9497,
        "pickup_longitude": 79.8428,
        "dropoff_address": "Galle Fort",
        "dropoff_latitude": 6.0269,
        "dropoff_longitude": 80.2168,
        "pickup_time": pickup_time,
        "delivery_time": "2024-06-30T18:00:00Z",
        "package_type": "Pallet",
        "quantity": 4,
        "vehicle_id": "ABC-1234"
    })
}

async fn schedule(app: &TestApp, payload: Value) -> Value {
    let (status, body) = app
        .call(Method::POST, "/api/delivery-schedules", Some(payload))
        .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body
}

#[tokio::test]
async fn scheduled_deliveries_start_pending() {
    let app = TestApp::new().await;
    let created = schedule(&app, delivery_payload("2024-06-01T08:00:00Z")).await;

    let delivery_id = created["delivery_id"].as_str().unwrap();
    assert!(delivery_id.starts_with("DS-"));
    assert_eq!(delivery_id.len(), 9);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["quantity"], 4);
}

#[tokio::test]
async fn status_can_be_moved_freely() {
    let app = TestApp::new().await;
    let created = schedule(&app, delivery_payload("2024-06-01T08:00:00Z")).await;
    let uri = format!("/api/Delivery/{}", created["delivery_id"].as_str().unwrap());

    let (status, updated) = app
        .call(Method::PUT, &uri, Some(json!({ "status": "In Transit" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "In Transit");
    assert_eq!(updated["pickup_address"], "Port of Colombo");

    let (_, delivered) = app
        .call(Method::PUT, &uri, Some(json!({ "status": "Delivered" })))
        .await;
    assert_eq!(delivered["status"], "Delivered");

    // No transition table: a delivered schedule may go back to pending
    let (status, reopened) = app
        .call(Method::PUT, &uri, Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["status"], "pending");

    let (_, fetched) = app.call(Method::GET, &uri, None).await;
    assert_eq!(fetched["status"], "pending");
}

#[tokio::test]
async fn unknown_status_values_are_rejected() {
    let app = TestApp::new().await;
    let created = schedule(&app, delivery_payload("2024-06-01T08:00:00Z")).await;
    let uri = format!("/api/Delivery/{}", created["delivery_id"].as_str().unwrap());

    let (status, body) = app
        .call(Method::PUT, &uri, Some(json!({ "status": "Lost" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = app
        .call(Method::GET, "/api/delivery-schedules?status=Lost", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = app.call(Method::GET, &uri, None).await;
    assert_eq!(fetched["status"], "pending");
}

#[tokio::test]
async fn invalid_coordinates_are_rejected() {
    let app = TestApp::new().await;
    let mut payload = delivery_payload("2024-06-01T08:00:00Z");
    payload["dropoff_latitude"] = json!(123.4);

    let (status, body) = app
        .call(Method::POST, "/api/delivery-schedules", Some(payload))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn deliveries_filter_by_status_and_pickup_window() {
    let app = TestApp::new().await;
    let early = schedule(&app, delivery_payload("2024-06-01T08:00:00Z")).await;
    let middle = schedule(&app, delivery_payload("2024-06-10T08:00:00Z")).await;
    schedule(&app, delivery_payload("2024-06-20T08:00:00Z")).await;

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/Delivery/{}", middle["delivery_id"].as_str().unwrap()),
            Some(json!({ "status": "In Transit" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, in_transit) = app
        .call(
            Method::GET,
            "/api/delivery-schedules?status=In%20Transit",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = in_transit["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["delivery_id"], middle["delivery_id"]);

    let (status, windowed) = app
        .call(
            Method::GET,
            "/api/delivery-schedules?from=2024-05-31T00:00:00Z&to=2024-06-15T00:00:00Z",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&Value> = windowed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| &d["delivery_id"])
        .collect();
    assert_eq!(ids, vec![&early["delivery_id"], &middle["delivery_id"]]);

    let (status, body) = app
        .call(
            Method::GET,
            "/api/delivery-schedules?from=2024-06-15T00:00:00Z&to=2024-06-01T00:00:00Z",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("from"));
}

#[tokio::test]
async fn missing_deliveries_return_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app.call(Method::GET, "/api/Delivery/DS-NOPE00", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/Delivery/DS-NOPE00",
            Some(json!({ "status": "Cancel" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let created = schedule(&app, delivery_payload("2024-06-01T08:00:00Z")).await;
    let uri = format!("/api/Delivery/{}", created["delivery_id"].as_str().unwrap());
    let (status, _) = app.call(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.call(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn every_scheduled_delivery_gets_a_distinct_identifier() {
    let app = TestApp::new().await;
    let mut ids = std::collections::HashSet::new();

    for day in 1..=12 {
        let created = schedule(
            &app,
            delivery_payload(&format!("2024-06-{day:02}T08:00:00Z")),
        )
        .await;
        assert!(ids.insert(created["delivery_id"].as_str().unwrap().to_string()));
    }

    let (_, listing) = app
        .call(Method::GET, "/api/delivery-schedules?per_page=50", None)
        .await;
    assert_eq!(listing["pagination"]["total"], 12);
}
