mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use logistics_api::entities::warehouse;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn warehouse_ids_are_allocated_in_sequence() {
    let app = TestApp::new().await;

    let first = app.create_warehouse("Colombo North").await;
    let second = app.create_warehouse("Kandy Depot").await;

    assert_eq!(first["warehouse_id"], "WH101");
    assert_eq!(second["warehouse_id"], "WH102");
    assert_eq!(first["bulky_capacity"], 40);
    assert_eq!(first["hazardous_capacity"], 0);
}

#[tokio::test]
async fn allocation_continues_after_the_highest_existing_id() {
    let app = TestApp::new().await;

    for existing in ["WH100", "WH105", "WH107", "WHX"] {
        warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            warehouse_id: Set(existing.to_string()),
            name: Set(format!("Legacy {existing}")),
            address: Set("1 Old Rd".to_string()),
            city: Set("Galle".to_string()),
            province: Set("Southern".to_string()),
            postal_code: Set(None),
            bulky_capacity: Set(0),
            hazardous_capacity: Set(0),
            perishable_capacity: Set(0),
            spare_parts_capacity: Set(0),
            other_capacity: Set(0),
            ..Default::default()
        }
        .insert(app.state.db.as_ref())
        .await
        .expect("seed legacy warehouse");
    }

    let created = app.create_warehouse("Matara Hub").await;
    assert_eq!(created["warehouse_id"], "WH108");
}

#[tokio::test]
async fn warehouse_crud_round_trip() {
    let app = TestApp::new().await;
    let created = app.create_warehouse("Colombo North").await;
    let id = created["warehouse_id"].as_str().unwrap().to_string();

    let (status, fetched) = app
        .call(Method::GET, &format!("/api/Warehouse/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Colombo North");

    let (status, updated) = app
        .call(
            Method::PUT,
            &format!("/api/Warehouse/{id}"),
            Some(json!({ "name": "Colombo North Annex", "other_capacity": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Colombo North Annex");
    assert_eq!(updated["other_capacity"], 12);
    // Untouched fields survive the merge
    assert_eq!(updated["city"], "Colombo");
    assert_eq!(updated["warehouse_id"], id.as_str());

    let (status, body) = app
        .call(Method::DELETE, &format!("/api/Warehouse/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .call(Method::GET, &format!("/api/Warehouse/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_warehouses_return_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::DELETE, "/api/Warehouse/WH999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("WH999"));
    assert!(body["request_id"].is_string());

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/Warehouse/WH999",
            Some(json!({ "name": "Ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.call(Method::GET, "/api/Warehouse", None).await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[tokio::test]
async fn invalid_warehouse_payloads_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/Warehouse",
            Some(json!({
                "name": "",
                "address": "12 Harbour Rd",
                "city": "Colombo",
                "province": "Western"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/Warehouse",
            Some(json!({
                "name": "Negative",
                "address": "12 Harbour Rd",
                "city": "Colombo",
                "province": "Western",
                "bulky_capacity": -5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.call(Method::GET, "/api/Warehouse", None).await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[tokio::test]
async fn warehouse_listing_is_paginated() {
    let app = TestApp::new().await;
    for name in ["A", "B", "C"] {
        app.create_warehouse(name).await;
    }

    let (status, page_one) = app
        .call(Method::GET, "/api/Warehouse?page=1&per_page=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page_one["data"].as_array().unwrap().len(), 2);
    assert_eq!(page_one["pagination"]["total"], 3);
    assert_eq!(page_one["pagination"]["total_pages"], 2);

    let (_, page_two) = app
        .call(Method::GET, "/api/Warehouse?page=2&per_page=2", None)
        .await;
    assert_eq!(page_two["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_range_pages_are_rejected() {
    let app = TestApp::new().await;
    app.create_warehouse("Kandy Hub").await;

    let (status, body) = app
        .call(
            Method::GET,
            "/api/Warehouse?page=1000000000000000000&per_page=20",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = app
        .call(
            Method::GET,
            "/api/delivery-schedules?page=18446744073709551615",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Far past the end but addressable: just an empty page
    let (status, body) = app
        .call(Method::GET, "/api/Warehouse?page=5000&per_page=20", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 1);
}
