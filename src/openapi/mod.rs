use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Logistics API",
        version = "0.1.0",
        description = r#"
# Logistics back-office API

Warehouse records, vehicle fleet and maintenance tracking, delivery scheduling and
inventory management.

## Identifiers

- Warehouses are addressed by `WH<n>` identifiers allocated in sequence (`WH101`, `WH102`, ...)
- Deliveries and maintenance records get random `DS-XXXXXX` / `MT-XXXXXX` identifiers
- Vehicles are addressed by registration number, inventory items by UUID

## Error Handling

Every failure returns the same body:

```json
{
  "error": "Not Found",
  "message": "Not found: Warehouse WH204 not found",
  "request_id": "7f1c7b0e-2d7e-4c4e-9a55-0d4f6f0b7f57",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20, capped by the
server's configured maximum) and answer `{ "data": [...], "pagination": {...} }`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "warehouses", description = "Warehouse records"),
        (name = "vehicles", description = "Vehicle fleet"),
        (name = "maintenance", description = "Vehicle maintenance history"),
        (name = "deliveries", description = "Delivery scheduling"),
        (name = "inventory", description = "Stock records and stockouts"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Warehouses
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::update_warehouse,
        crate::handlers::warehouses::delete_warehouse,

        // Vehicles
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::get_vehicle,
        crate::handlers::vehicles::update_vehicle,
        crate::handlers::vehicles::delete_vehicle,

        // Maintenance
        crate::handlers::maintenance::create_maintenance,
        crate::handlers::maintenance::list_maintenance,
        crate::handlers::maintenance::get_maintenance,
        crate::handlers::maintenance::delete_maintenance,

        // Deliveries
        crate::handlers::deliveries::create_delivery,
        crate::handlers::deliveries::list_deliveries,
        crate::handlers::deliveries::get_delivery,
        crate::handlers::deliveries::update_delivery,
        crate::handlers::deliveries::delete_delivery,

        // Inventory
        crate::handlers::inventory::create_inventory,
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::list_low_stock,
        crate::handlers::inventory::list_expiring,
        crate::handlers::inventory::get_inventory,
        crate::handlers::inventory::update_inventory,
        crate::handlers::inventory::delete_inventory,
        crate::handlers::inventory::stockout,

        // Health
        crate::health::health_check,
        crate::health::api_status,
    ),
    components(
        schemas(
            crate::entities::warehouse::Model,
            crate::entities::vehicle::Model,
            crate::entities::vehicle::MaintenanceRefs,
            crate::entities::maintenance_record::Model,
            crate::entities::delivery_schedule::Model,
            crate::entities::delivery_schedule::DeliveryStatus,
            crate::entities::inventory_item::Model,

            crate::services::warehouses::CreateWarehouseInput,
            crate::services::warehouses::UpdateWarehouseInput,
            crate::services::vehicles::CreateVehicleInput,
            crate::services::vehicles::UpdateVehicleInput,
            crate::services::maintenance::CreateMaintenanceInput,
            crate::services::deliveries::CreateDeliveryInput,
            crate::services::deliveries::UpdateDeliveryInput,
            crate::services::inventory::CreateInventoryItemInput,
            crate::services::inventory::UpdateInventoryItemInput,
            crate::services::inventory::StockoutRequest,

            crate::handlers::common::PaginationMeta,
            crate::health::HealthInfo,
            crate::health::StatusInfo,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
