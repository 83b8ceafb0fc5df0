use crate::{
    entities::delivery_schedule,
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, no_content_response, success_response, ApiJson, ApiPath, ApiQuery,
        PaginatedResponse, PaginationParams,
    },
    services::deliveries::{CreateDeliveryInput, DeliveryFilter, UpdateDeliveryInput},
    AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::get,
    Router,
};

/// Collection lives at `/delivery-schedules`, single records at `/Delivery/:id`.
pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/delivery-schedules",
            get(list_deliveries).post(create_delivery),
        )
        .route(
            "/Delivery/:id",
            get(get_delivery).put(update_delivery).delete(delete_delivery),
        )
}

#[utoipa::path(
    post,
    path = "/api/delivery-schedules",
    request_body = CreateDeliveryInput,
    responses(
        (status = 201, description = "Delivery scheduled", body = delivery_schedule::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Identifier allocation exhausted", body = ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn create_delivery(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateDeliveryInput>,
) -> Result<Response, ServiceError> {
    let created = state.services.deliveries.create_delivery(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/api/delivery-schedules",
    params(DeliveryFilter, PaginationParams),
    responses(
        (status = 200, description = "Deliveries listed", body = PaginatedResponse<delivery_schedule::Model>),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn list_deliveries(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DeliveryFilter>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let result = state
        .services
        .deliveries
        .list_deliveries(filter, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/Delivery/{id}",
    params(("id" = String, Path, description = "Delivery identifier, e.g. DS-4HX9TQ")),
    responses(
        (status = 200, description = "Delivery fetched", body = delivery_schedule::Model),
        (status = 404, description = "Delivery not found", body = ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn get_delivery(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ServiceError> {
    let delivery = state.services.deliveries.get_delivery(&id).await?;
    Ok(success_response(delivery))
}

/// Partial update; any status may be set.
#[utoipa::path(
    put,
    path = "/api/Delivery/{id}",
    params(("id" = String, Path, description = "Delivery identifier")),
    request_body = UpdateDeliveryInput,
    responses(
        (status = 200, description = "Delivery updated", body = delivery_schedule::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Delivery not found", body = ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn update_delivery(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<UpdateDeliveryInput>,
) -> Result<Response, ServiceError> {
    let updated = state
        .services
        .deliveries
        .update_delivery(&id, payload)
        .await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/Delivery/{id}",
    params(("id" = String, Path, description = "Delivery identifier")),
    responses(
        (status = 204, description = "Delivery deleted"),
        (status = 404, description = "Delivery not found", body = ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn delete_delivery(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ServiceError> {
    state.services.deliveries.delete_delivery(&id).await?;
    Ok(no_content_response())
}
