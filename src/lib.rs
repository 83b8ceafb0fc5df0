//! Logistics back-office API
//!
//! Warehouses, vehicle fleet and maintenance, delivery scheduling and inventory,
//! served over axum with sea-orm persistence.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Instant;

pub use handlers::common::{PaginatedResponse, PaginationMeta};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<config::AppConfig>,
    pub services: handlers::AppServices,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), config.id_max_attempts);
        Self {
            db,
            config: Arc::new(config),
            services,
            started_at: Instant::now(),
        }
    }
}

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::deliveries::delivery_routes())
        .merge(handlers::vehicles::vehicle_routes())
        .merge(handlers::maintenance::maintenance_routes())
        .merge(handlers::warehouses::warehouse_routes())
        .merge(handlers::inventory::inventory_routes())
}

/// Full application router: `/api`, health and status, and the API docs.
///
/// Cross-cutting layers (CORS, compression, tracing, request ids) are added by
/// the binary so tests can drive the bare router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/status", get(health::api_status))
        .nest("/api", api_routes())
        .with_state(state)
        .merge(openapi::swagger_ui())
}
