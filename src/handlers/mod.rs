pub mod common;
pub mod deliveries;
pub mod inventory;
pub mod maintenance;
pub mod vehicles;
pub mod warehouses;

use crate::{
    db::DbPool,
    services::{
        deliveries::DeliveryService, inventory::InventoryService,
        maintenance::MaintenanceService, vehicles::VehicleService,
        warehouses::WarehouseService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub warehouses: Arc<WarehouseService>,
    pub vehicles: Arc<VehicleService>,
    pub maintenance: Arc<MaintenanceService>,
    pub deliveries: Arc<DeliveryService>,
    pub inventory: Arc<InventoryService>,
}

impl AppServices {
    /// `id_max_attempts` bounds the insert retries of the slices that generate identifiers.
    pub fn new(db_pool: Arc<DbPool>, id_max_attempts: u32) -> Self {
        Self {
            warehouses: Arc::new(WarehouseService::new(db_pool.clone(), id_max_attempts)),
            vehicles: Arc::new(VehicleService::new(db_pool.clone())),
            maintenance: Arc::new(MaintenanceService::new(db_pool.clone(), id_max_attempts)),
            deliveries: Arc::new(DeliveryService::new(db_pool.clone(), id_max_attempts)),
            inventory: Arc::new(InventoryService::new(db_pool)),
        }
    }
}
