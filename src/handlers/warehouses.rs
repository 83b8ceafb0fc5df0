use crate::{
    entities::warehouse,
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, no_content_response, success_response, ApiJson, ApiPath, ApiQuery,
        PaginatedResponse, PaginationParams,
    },
    services::warehouses::{CreateWarehouseInput, UpdateWarehouseInput},
    AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::get,
    Router,
};

pub fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/Warehouse", get(list_warehouses).post(create_warehouse))
        .route(
            "/Warehouse/:id",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
}

/// Create a warehouse; its `WH` identifier is allocated server-side.
#[utoipa::path(
    post,
    path = "/api/Warehouse",
    request_body = CreateWarehouseInput,
    responses(
        (status = 201, description = "Warehouse created", body = warehouse::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Identifier allocation exhausted", body = ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateWarehouseInput>,
) -> Result<Response, ServiceError> {
    let created = state.services.warehouses.create_warehouse(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/api/Warehouse",
    params(PaginationParams),
    responses(
        (status = 200, description = "Warehouses listed", body = PaginatedResponse<warehouse::Model>)
    ),
    tag = "warehouses"
)]
pub async fn list_warehouses(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let result = state
        .services
        .warehouses
        .list_warehouses(page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/Warehouse/{id}",
    params(("id" = String, Path, description = "Warehouse identifier, e.g. WH101")),
    responses(
        (status = 200, description = "Warehouse fetched", body = warehouse::Model),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ServiceError> {
    let warehouse = state.services.warehouses.get_warehouse(&id).await?;
    Ok(success_response(warehouse))
}

#[utoipa::path(
    put,
    path = "/api/Warehouse/{id}",
    params(("id" = String, Path, description = "Warehouse identifier")),
    request_body = UpdateWarehouseInput,
    responses(
        (status = 200, description = "Warehouse updated", body = warehouse::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn update_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<UpdateWarehouseInput>,
) -> Result<Response, ServiceError> {
    let updated = state
        .services
        .warehouses
        .update_warehouse(&id, payload)
        .await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/Warehouse/{id}",
    params(("id" = String, Path, description = "Warehouse identifier")),
    responses(
        (status = 204, description = "Warehouse deleted"),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn delete_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ServiceError> {
    state.services.warehouses.delete_warehouse(&id).await?;
    Ok(no_content_response())
}
