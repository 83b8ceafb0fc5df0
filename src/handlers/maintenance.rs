use crate::{
    entities::maintenance_record,
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, no_content_response, success_response, ApiJson, ApiPath, ApiQuery,
        PaginatedResponse, PaginationParams,
    },
    services::maintenance::{CreateMaintenanceInput, MaintenanceFilter},
    AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::get,
    Router,
};

pub fn maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/maintenance", get(list_maintenance).post(create_maintenance))
        .route(
            "/maintenance/:id",
            get(get_maintenance).delete(delete_maintenance),
        )
}

/// Record maintenance and attach it to the vehicle with the same registration number.
#[utoipa::path(
    post,
    path = "/api/maintenance",
    request_body = CreateMaintenanceInput,
    responses(
        (status = 201, description = "Maintenance recorded", body = maintenance_record::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn create_maintenance(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateMaintenanceInput>,
) -> Result<Response, ServiceError> {
    let record = state
        .services
        .maintenance
        .create_maintenance(payload)
        .await?;
    Ok(created_response(record))
}

#[utoipa::path(
    get,
    path = "/api/maintenance",
    params(MaintenanceFilter, PaginationParams),
    responses(
        (status = 200, description = "Maintenance records listed", body = PaginatedResponse<maintenance_record::Model>)
    ),
    tag = "maintenance"
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<MaintenanceFilter>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let result = state
        .services
        .maintenance
        .list_maintenance(filter, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/maintenance/{id}",
    params(("id" = String, Path, description = "Maintenance identifier, e.g. MT-7KQ2PX")),
    responses(
        (status = 200, description = "Maintenance record fetched", body = maintenance_record::Model),
        (status = 404, description = "Maintenance record not found", body = ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn get_maintenance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ServiceError> {
    let record = state.services.maintenance.get_maintenance(&id).await?;
    Ok(success_response(record))
}

#[utoipa::path(
    delete,
    path = "/api/maintenance/{id}",
    params(("id" = String, Path, description = "Maintenance identifier")),
    responses(
        (status = 204, description = "Maintenance record deleted"),
        (status = 404, description = "Maintenance record not found", body = ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn delete_maintenance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ServiceError> {
    state.services.maintenance.delete_maintenance(&id).await?;
    Ok(no_content_response())
}
