use crate::{
    entities::vehicle,
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, no_content_response, success_response, ApiJson, ApiPath, ApiQuery,
        PaginatedResponse, PaginationParams,
    },
    services::vehicles::{CreateVehicleInput, UpdateVehicleInput},
    AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::get,
    Router,
};

/// Vehicles are addressed by registration number.
pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

#[utoipa::path(
    post,
    path = "/api/vehicles",
    request_body = CreateVehicleInput,
    responses(
        (status = 201, description = "Vehicle registered", body = vehicle::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Registration number or owner NIC already in use", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateVehicleInput>,
) -> Result<Response, ServiceError> {
    let created = state.services.vehicles.create_vehicle(payload).await?;
    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    params(PaginationParams),
    responses(
        (status = 200, description = "Vehicles listed", body = PaginatedResponse<vehicle::Model>)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Response, ServiceError> {
    let (page, per_page) = pagination.resolve(&state.config);
    let result = state.services.vehicles.list_vehicles(page, per_page).await?;
    Ok(success_response(PaginatedResponse::from_page(
        result, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Vehicle fetched", body = vehicle::Model),
        (status = 404, description = "Vehicle not found", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    ApiPath(registration_number): ApiPath<String>,
) -> Result<Response, ServiceError> {
    let vehicle = state
        .services
        .vehicles
        .get_vehicle(&registration_number)
        .await?;
    Ok(success_response(vehicle))
}

#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Registration number")),
    request_body = UpdateVehicleInput,
    responses(
        (status = 200, description = "Vehicle updated", body = vehicle::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Vehicle not found", body = ErrorResponse),
        (status = 409, description = "Owner NIC already in use", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    ApiPath(registration_number): ApiPath<String>,
    ApiJson(payload): ApiJson<UpdateVehicleInput>,
) -> Result<Response, ServiceError> {
    let updated = state
        .services
        .vehicles
        .update_vehicle(&registration_number, payload)
        .await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Registration number")),
    responses(
        (status = 204, description = "Vehicle deleted; maintenance history is kept"),
        (status = 404, description = "Vehicle not found", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    ApiPath(registration_number): ApiPath<String>,
) -> Result<Response, ServiceError> {
    state
        .services
        .vehicles
        .delete_vehicle(&registration_number)
        .await?;
    Ok(no_content_response())
}
