use crate::{
    entities::inventory_item,
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, no_content_response, success_response, ApiJson, ApiPath, ApiQuery,
        PaginatedResponse, PaginationParams,
    },
    services::inventory::{
        parse_stockout_quantity, CreateInventoryItemInput, InventoryFilter, StockoutRequest,
        UpdateInventoryItemInput, DEFAULT_LOW_STOCK_THRESHOLD,
    },
    AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Items with quantity strictly below this value are listed (default 10)
    pub threshold: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpiringQuery {
    /// Upper bound for `expiry_date` (default: 30 days from now)
    pub before: Option<DateTime<Utc>>,
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory).post(create_inventory))
        .route("/inventory/low-stock", get(list_low_stock))
        .route("/inventory/expiring", get(list_expiring))
        .route(
            "/inventory/:id",
            get(get_inventory)
                .put(update_inventory)
                .delete(delete_inventory),
        )
        .route("/inventory/:id/stockout", post(stockout))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = CreateInventoryItemInput,
    responses(
        (status = 201, description = "Inventory item created", body = inventory_item::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateInventoryItemInput>,
) -> Result<Response, ServiceError> {
    let created = state.services.inventory.create_item(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/api/inventory",
    params(InventoryFilter, PaginationParams),
    responses(
        (status = 200, description = "Inventory listed", body = PaginatedResponse<inventory_item::Model>)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<InventoryFilter>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let result = state
        .services
        .inventory
        .list_items(filter, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    params(LowStockQuery, PaginationParams),
    responses(
        (status = 200, description = "Items below the threshold", body = PaginatedResponse<inventory_item::Model>),
        (status = 400, description = "Negative threshold", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LowStockQuery>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let result = state
        .services
        .inventory
        .list_low_stock(threshold, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/inventory/expiring",
    params(ExpiringQuery, PaginationParams),
    responses(
        (status = 200, description = "Items expiring before the cutoff", body = PaginatedResponse<inventory_item::Model>)
    ),
    tag = "inventory"
)]
pub async fn list_expiring(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpiringQuery>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let result = state
        .services
        .inventory
        .list_expiring(query.before, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item fetched", body = inventory_item::Model),
        (status = 404, description = "Inventory item not found", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, ServiceError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(success_response(item))
}

#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = UpdateInventoryItemInput,
    responses(
        (status = 200, description = "Inventory item updated", body = inventory_item::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Inventory item not found", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateInventoryItemInput>,
) -> Result<Response, ServiceError> {
    let updated = state.services.inventory.update_item(id, payload).await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 204, description = "Inventory item deleted"),
        (status = 404, description = "Inventory item not found", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_inventory(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, ServiceError> {
    state.services.inventory.delete_item(id).await?;
    Ok(no_content_response())
}

/// Remove stock from an item. Fails without touching stock when the quantity is
/// not a positive whole number or exceeds what is on hand.
#[utoipa::path(
    post,
    path = "/api/inventory/{id}/stockout",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = StockoutRequest,
    responses(
        (status = 200, description = "Stock removed", body = inventory_item::Model),
        (status = 400, description = "Invalid or excessive quantity", body = ErrorResponse),
        (status = 404, description = "Inventory item not found", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn stockout(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StockoutRequest>,
) -> Result<Response, ServiceError> {
    let quantity = parse_stockout_quantity(payload.quantity.as_ref())?;
    let updated = state.services.inventory.stockout(id, quantity).await?;
    Ok(success_response(updated))
}
