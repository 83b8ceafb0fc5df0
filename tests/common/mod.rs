#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use logistics_api::{config::AppConfig, db, middleware_helpers, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`] but lets the caller tweak the configuration first.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.cors_allow_any_origin = true;
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = logistics_api::app_router(state.clone()).layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ));

        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends the request and returns the status with the parsed JSON body (`Null` when empty).
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn create_warehouse(&self, name: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/Warehouse",
                Some(json!({
                    "name": name,
                    "address": "12 Harbour Rd",
                    "city": "Colombo",
                    "province": "Western",
                    "bulky_capacity": 40,
                    "perishable_capacity": 10
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
        body
    }

    pub async fn create_vehicle(&self, registration_number: &str, owner_nic: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/vehicles",
                Some(json!({
                    "owner_name": "Nimal Perera",
                    "owner_nic": owner_nic,
                    "owner_contact": "+94 77 123 4567",
                    "registration_number": registration_number,
                    "vehicle_type": "Lorry",
                    "make": "Isuzu",
                    "model": "Elf",
                    "manufacture_year": 2019,
                    "load_capacity": 3500
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
        body
    }

    pub async fn create_inventory_item(&self, product_name: &str, quantity: i64) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/inventory",
                Some(json!({
                    "product_name": product_name,
                    "brand": "Anchor",
                    "category": "Dairy",
                    "price": 450.5,
                    "quantity": quantity,
                    "supplier_name": "Fonterra Lanka"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
        body
    }
}

/// Parse a response body as JSON, returning `Value::Null` for empty bodies.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not valid JSON")
    }
}
