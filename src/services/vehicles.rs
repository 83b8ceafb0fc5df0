use crate::{
    db::DbPool,
    entities::vehicle::{self, MaintenanceRefs},
    errors::ServiceError,
    services::{page_bounds, validate_non_negative, Page},
};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleInput {
    #[validate(length(min = 1, message = "owner_name is required"))]
    pub owner_name: String,
    #[validate(length(min = 1, message = "owner_nic is required"))]
    pub owner_nic: String,
    #[validate(length(min = 1, message = "owner_contact is required"))]
    pub owner_contact: String,
    #[validate(length(min = 1, message = "registration_number is required"))]
    pub registration_number: String,
    #[validate(length(min = 1))]
    pub vehicle_type: String,
    #[validate(length(min = 1))]
    pub make: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub manufacture_year: Option<i32>,
    #[validate(custom = "validate_non_negative")]
    pub load_capacity: Decimal,
    pub driver_id: Option<String>,
}

/// Partial merge; the registration number and maintenance list cannot be edited here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleInput {
    #[validate(length(min = 1))]
    pub owner_name: Option<String>,
    #[validate(length(min = 1))]
    pub owner_nic: Option<String>,
    #[validate(length(min = 1))]
    pub owner_contact: Option<String>,
    #[validate(length(min = 1))]
    pub vehicle_type: Option<String>,
    #[validate(length(min = 1))]
    pub make: Option<String>,
    #[validate(length(min = 1))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub manufacture_year: Option<i32>,
    #[validate(custom = "validate_non_negative")]
    pub load_capacity: Option<Decimal>,
    pub driver_id: Option<String>,
}

/// Service for the vehicle fleet
#[derive(Clone)]
pub struct VehicleService {
    db_pool: Arc<DbPool>,
}

impl VehicleService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Registers a vehicle. Duplicate registration numbers or owner NICs are conflicts.
    #[instrument(skip(self, input), fields(registration_number = %input.registration_number))]
    pub async fn create_vehicle(
        &self,
        input: CreateVehicleInput,
    ) -> Result<vehicle::Model, ServiceError> {
        input.validate()?;

        let created = vehicle::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_name: Set(input.owner_name),
            owner_nic: Set(input.owner_nic),
            owner_contact: Set(input.owner_contact),
            registration_number: Set(input.registration_number),
            vehicle_type: Set(input.vehicle_type),
            make: Set(input.make),
            model: Set(input.model),
            manufacture_year: Set(input.manufacture_year),
            load_capacity: Set(input.load_capacity),
            driver_id: Set(input.driver_id),
            maintenance_records: Set(MaintenanceRefs::default()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        counter!("logistics_records.created", 1, "entity" => "vehicle");
        info!("vehicle registered");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_vehicle(
        &self,
        registration_number: &str,
    ) -> Result<vehicle::Model, ServiceError> {
        find_by_registration(&*self.db_pool, registration_number)
            .await?
            .ok_or_else(|| ServiceError::not_found("Vehicle", registration_number))
    }

    #[instrument(skip(self))]
    pub async fn list_vehicles(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<vehicle::Model>, ServiceError> {
        let (page, per_page) = page_bounds(page, per_page)?;
        let paginator = vehicle::Entity::find()
            .order_by_asc(vehicle::Column::RegistrationNumber)
            .paginate(&*self.db_pool, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_vehicle(
        &self,
        registration_number: &str,
        input: UpdateVehicleInput,
    ) -> Result<vehicle::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_vehicle(registration_number).await?;

        let mut active: vehicle::ActiveModel = existing.into();
        if let Some(owner_name) = input.owner_name {
            active.owner_name = Set(owner_name);
        }
        if let Some(owner_nic) = input.owner_nic {
            active.owner_nic = Set(owner_nic);
        }
        if let Some(owner_contact) = input.owner_contact {
            active.owner_contact = Set(owner_contact);
        }
        if let Some(vehicle_type) = input.vehicle_type {
            active.vehicle_type = Set(vehicle_type);
        }
        if let Some(make) = input.make {
            active.make = Set(make);
        }
        if let Some(model) = input.model {
            active.model = Set(model);
        }
        if let Some(year) = input.manufacture_year {
            active.manufacture_year = Set(Some(year));
        }
        if let Some(load_capacity) = input.load_capacity {
            active.load_capacity = Set(load_capacity);
        }
        if let Some(driver_id) = input.driver_id {
            active.driver_id = Set(Some(driver_id));
        }

        let updated = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        info!(registration_number, "vehicle updated");
        Ok(updated)
    }

    /// Removes the vehicle only; its maintenance records are kept.
    #[instrument(skip(self))]
    pub async fn delete_vehicle(&self, registration_number: &str) -> Result<(), ServiceError> {
        let result = vehicle::Entity::delete_many()
            .filter(vehicle::Column::RegistrationNumber.eq(registration_number))
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Vehicle", registration_number));
        }
        info!(registration_number, "vehicle deleted");
        Ok(())
    }
}

pub(crate) async fn find_by_registration<C>(
    db: &C,
    registration_number: &str,
) -> Result<Option<vehicle::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    vehicle::Entity::find()
        .filter(vehicle::Column::RegistrationNumber.eq(registration_number))
        .one(db)
        .await
}

/// Appends `maintenance_id` to the vehicle's reference list.
///
/// Returns `false` when no vehicle carries `registration_number`. This is a
/// read-modify-write of one row: two concurrent appends for the same vehicle
/// can lose one of them.
pub(crate) async fn append_maintenance_ref<C>(
    db: &C,
    registration_number: &str,
    maintenance_id: &str,
) -> Result<bool, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let Some(vehicle) = find_by_registration(db, registration_number).await? else {
        return Ok(false);
    };

    let mut refs = vehicle.maintenance_records.clone();
    refs.push(maintenance_id);

    let mut active: vehicle::ActiveModel = vehicle.into();
    active.maintenance_records = Set(refs);
    active.update(db).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn load_capacity_must_not_be_negative() {
        let negative = UpdateVehicleInput {
            load_capacity: Some(dec!(-0.01)),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let empty = UpdateVehicleInput {
            load_capacity: Some(dec!(0)),
            ..Default::default()
        };
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn update_rejects_blank_owner_name() {
        let input = UpdateVehicleInput {
            owner_name: Some(String::new()),
            ..Default::default()
        };
        assert!(input.validate().is_err());
        assert!(UpdateVehicleInput::default().validate().is_ok());
    }
}
