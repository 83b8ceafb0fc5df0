mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

fn maintenance_payload(registration_number: &str) -> Value {
    json!({
        "registration_number": registration_number,
        "maintenance_date": "2024-05-20T09:30:00Z",
        "maintenance_type": "Oil change",
        "cost": "12500.00",
        "description": "Engine oil and filter"
    })
}

#[tokio::test]
async fn maintenance_is_linked_to_its_vehicle() {
    let app = TestApp::new().await;
    let vehicle = app.create_vehicle("ABC-1234", "199012345678").await;
    assert_eq!(vehicle["maintenance_records"], json!([]));

    let (status, record) = app
        .call(
            Method::POST,
            "/api/maintenance",
            Some(maintenance_payload("ABC-1234")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {record}");
    let maintenance_id = record["maintenance_id"].as_str().unwrap().to_string();
    assert!(maintenance_id.starts_with("MT-"));
    assert_eq!(maintenance_id.len(), 9);

    let (status, fetched) = app.call(Method::GET, "/api/vehicles/ABC-1234", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["maintenance_records"], json!([maintenance_id]));

    let (status, fetched_record) = app
        .call(Method::GET, &format!("/api/maintenance/{maintenance_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched_record["registration_number"], "ABC-1234");
    assert_eq!(fetched_record["maintenance_type"], "Oil change");
}

#[tokio::test]
async fn maintenance_references_accumulate_in_order() {
    let app = TestApp::new().await;
    app.create_vehicle("WP-KA-4455", "198876543210").await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let (status, record) = app
            .call(
                Method::POST,
                "/api/maintenance",
                Some(maintenance_payload("WP-KA-4455")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(record["maintenance_id"].clone());
    }

    let (_, vehicle) = app.call(Method::GET, "/api/vehicles/WP-KA-4455", None).await;
    assert_eq!(vehicle["maintenance_records"], Value::Array(ids));
}

#[tokio::test]
async fn maintenance_for_an_unknown_vehicle_is_still_recorded() {
    let app = TestApp::new().await;

    let (status, record) = app
        .call(
            Method::POST,
            "/api/maintenance",
            Some(maintenance_payload("NOPE-0001")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["registration_number"], "NOPE-0001");

    let (status, listed) = app
        .call(
            Method::GET,
            "/api/maintenance?registration_number=NOPE-0001",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["pagination"]["total"], 1);
}

#[tokio::test]
async fn duplicate_registration_or_nic_conflicts() {
    let app = TestApp::new().await;
    app.create_vehicle("ABC-1234", "199012345678").await;

    let duplicate_registration = json!({
        "owner_name": "Kamal Silva",
        "owner_nic": "200011112222",
        "owner_contact": "+94 71 000 0000",
        "registration_number": "ABC-1234",
        "vehicle_type": "Van",
        "make": "Toyota",
        "model": "HiAce",
        "load_capacity": 1200
    });
    let (status, body) = app
        .call(Method::POST, "/api/vehicles", Some(duplicate_registration))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let duplicate_nic = json!({
        "owner_name": "Nimal Perera",
        "owner_nic": "199012345678",
        "owner_contact": "+94 77 123 4567",
        "registration_number": "XYZ-9876",
        "vehicle_type": "Van",
        "make": "Toyota",
        "model": "HiAce",
        "load_capacity": 1200
    });
    let (status, _) = app
        .call(Method::POST, "/api/vehicles", Some(duplicate_nic))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = app.call(Method::GET, "/api/vehicles", None).await;
    assert_eq!(list["pagination"]["total"], 1);
}

#[tokio::test]
async fn deleting_a_vehicle_keeps_its_maintenance_history() {
    let app = TestApp::new().await;
    app.create_vehicle("ABC-1234", "199012345678").await;
    let (_, record) = app
        .call(
            Method::POST,
            "/api/maintenance",
            Some(maintenance_payload("ABC-1234")),
        )
        .await;
    let maintenance_id = record["maintenance_id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(Method::DELETE, "/api/vehicles/ABC-1234", None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call(Method::GET, "/api/vehicles/ABC-1234", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(Method::GET, &format!("/api/maintenance/{maintenance_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn vehicle_update_merges_fields() {
    let app = TestApp::new().await;
    app.create_vehicle("ABC-1234", "199012345678").await;

    let (status, updated) = app
        .call(
            Method::PUT,
            "/api/vehicles/ABC-1234",
            Some(json!({ "driver_id": "DRV-7", "owner_contact": "+94 70 555 5555" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["driver_id"], "DRV-7");
    assert_eq!(updated["owner_contact"], "+94 70 555 5555");
    assert_eq!(updated["make"], "Isuzu");
    assert_eq!(updated["registration_number"], "ABC-1234");

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/vehicles/UNKNOWN-1",
            Some(json!({ "driver_id": "DRV-7" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/vehicles/ABC-1234",
            Some(json!({ "load_capacity": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_maintenance_records_return_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .call(Method::GET, "/api/maintenance/MT-ZZZZZZ", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(Method::DELETE, "/api/maintenance/MT-ZZZZZZ", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
