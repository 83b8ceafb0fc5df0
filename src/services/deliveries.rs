use crate::{
    db::DbPool,
    entities::delivery_schedule::{self, DeliveryStatus},
    errors::ServiceError,
    services::{
        identifiers::{generate_short_id, insert_with_retry, DELIVERY_ID_PREFIX},
        page_bounds, Page,
    },
};
use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    coordinate_in_range(value, 90.0, "latitude must be within [-90, 90]")
}

fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    coordinate_in_range(value, 180.0, "longitude must be within [-180, 180]")
}

fn coordinate_in_range(value: f64, bound: f64, message: &'static str) -> Result<(), ValidationError> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some(message.into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDeliveryInput {
    #[validate(length(min = 1, message = "pickup_address is required"))]
    pub pickup_address: String,
    #[validate(custom = "validate_latitude")]
    pub pickup_latitude: Option<f64>,
    #[validate(custom = "validate_longitude")]
    pub pickup_longitude: Option<f64>,
    #[validate(length(min = 1, message = "dropoff_address is required"))]
    pub dropoff_address: String,
    #[validate(custom = "validate_latitude")]
    pub dropoff_latitude: Option<f64>,
    #[validate(custom = "validate_longitude")]
    pub dropoff_longitude: Option<f64>,
    pub pickup_time: DateTime<Utc>,
    pub delivery_time: DateTime<Utc>,
    #[validate(length(min = 1, message = "package_type is required"))]
    pub package_type: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub special_instructions: Option<String>,
    /// Defaults to `pending`
    pub status: Option<DeliveryStatus>,
}

/// Any subset of fields; `status` may move to any value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDeliveryInput {
    #[validate(length(min = 1))]
    pub pickup_address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub pickup_latitude: Option<f64>,
    #[validate(custom = "validate_longitude")]
    pub pickup_longitude: Option<f64>,
    #[validate(length(min = 1))]
    pub dropoff_address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub dropoff_latitude: Option<f64>,
    #[validate(custom = "validate_longitude")]
    pub dropoff_longitude: Option<f64>,
    pub pickup_time: Option<DateTime<Utc>>,
    pub delivery_time: Option<DateTime<Utc>>,
    #[validate(length(min = 1))]
    pub package_type: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub special_instructions: Option<String>,
    pub status: Option<DeliveryStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliveryFilter {
    pub status: Option<DeliveryStatus>,
    /// Earliest pickup time (inclusive)
    pub from: Option<DateTime<Utc>>,
    /// Latest pickup time (inclusive)
    pub to: Option<DateTime<Utc>>,
}

/// Service for delivery scheduling
#[derive(Clone)]
pub struct DeliveryService {
    db_pool: Arc<DbPool>,
    id_max_attempts: u32,
}

impl DeliveryService {
    pub fn new(db_pool: Arc<DbPool>, id_max_attempts: u32) -> Self {
        Self {
            db_pool,
            id_max_attempts,
        }
    }

    /// Schedules a delivery under a freshly generated `DS-` identifier.
    #[instrument(skip(self, input))]
    pub async fn create_delivery(
        &self,
        input: CreateDeliveryInput,
    ) -> Result<delivery_schedule::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let created = insert_with_retry("delivery", self.id_max_attempts, |_| {
            let input = input.clone();
            async move {
                delivery_schedule::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    delivery_id: Set(generate_short_id(DELIVERY_ID_PREFIX)),
                    pickup_address: Set(input.pickup_address),
                    pickup_latitude: Set(input.pickup_latitude),
                    pickup_longitude: Set(input.pickup_longitude),
                    dropoff_address: Set(input.dropoff_address),
                    dropoff_latitude: Set(input.dropoff_latitude),
                    dropoff_longitude: Set(input.dropoff_longitude),
                    pickup_time: Set(input.pickup_time),
                    delivery_time: Set(input.delivery_time),
                    package_type: Set(input.package_type),
                    quantity: Set(input.quantity),
                    vehicle_id: Set(input.vehicle_id),
                    driver_id: Set(input.driver_id),
                    special_instructions: Set(input.special_instructions),
                    status: Set(input.status.unwrap_or_default()),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        })
        .await?;

        counter!("logistics_records.created", 1, "entity" => "delivery");
        info!(delivery_id = %created.delivery_id, status = %created.status, "delivery scheduled");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_delivery(
        &self,
        delivery_id: &str,
    ) -> Result<delivery_schedule::Model, ServiceError> {
        delivery_schedule::Entity::find()
            .filter(delivery_schedule::Column::DeliveryId.eq(delivery_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Delivery", delivery_id))
    }

    /// Lists deliveries by pickup time.
    #[instrument(skip(self))]
    pub async fn list_deliveries(
        &self,
        filter: DeliveryFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<delivery_schedule::Model>, ServiceError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(ServiceError::BadRequest(
                    "`from` must not be later than `to`".to_string(),
                ));
            }
        }
        let (page, per_page) = page_bounds(page, per_page)?;

        let mut query = delivery_schedule::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(delivery_schedule::Column::Status.eq(status));
        }
        if let Some(from) = filter.from {
            query = query.filter(delivery_schedule::Column::PickupTime.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(delivery_schedule::Column::PickupTime.lte(to));
        }

        let paginator = query
            .order_by_asc(delivery_schedule::Column::PickupTime)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    /// Merges the supplied fields. The `delivery_id` never changes.
    #[instrument(skip(self, input))]
    pub async fn update_delivery(
        &self,
        delivery_id: &str,
        input: UpdateDeliveryInput,
    ) -> Result<delivery_schedule::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_delivery(delivery_id).await?;
        let previous_status = existing.status;

        let mut active: delivery_schedule::ActiveModel = existing.into();
        if let Some(address) = input.pickup_address {
            active.pickup_address = Set(address);
        }
        if let Some(lat) = input.pickup_latitude {
            active.pickup_latitude = Set(Some(lat));
        }
        if let Some(lng) = input.pickup_longitude {
            active.pickup_longitude = Set(Some(lng));
        }
        if let Some(address) = input.dropoff_address {
            active.dropoff_address = Set(address);
        }
        if let Some(lat) = input.dropoff_latitude {
            active.dropoff_latitude = Set(Some(lat));
        }
        if let Some(lng) = input.dropoff_longitude {
            active.dropoff_longitude = Set(Some(lng));
        }
        if let Some(time) = input.pickup_time {
            active.pickup_time = Set(time);
        }
        if let Some(time) = input.delivery_time {
            active.delivery_time = Set(time);
        }
        if let Some(package_type) = input.package_type {
            active.package_type = Set(package_type);
        }
        if let Some(quantity) = input.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(vehicle_id) = input.vehicle_id {
            active.vehicle_id = Set(Some(vehicle_id));
        }
        if let Some(driver_id) = input.driver_id {
            active.driver_id = Set(Some(driver_id));
        }
        if let Some(instructions) = input.special_instructions {
            active.special_instructions = Set(Some(instructions));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }

        let updated = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        if updated.status != previous_status {
            counter!("logistics_delivery.status_changes", 1, "to" => updated.status.to_string());
            info!(delivery_id, from = %previous_status, to = %updated.status, "delivery status changed");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_delivery(&self, delivery_id: &str) -> Result<(), ServiceError> {
        let result = delivery_schedule::Entity::delete_many()
            .filter(delivery_schedule::Column::DeliveryId.eq(delivery_id))
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Delivery", delivery_id));
        }
        info!(delivery_id, "delivery deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_payload() -> serde_json::Value {
        json!({
            "pickup_address": "Port of Colombo",
            "dropoff_address": "Galle Fort",
            "pickup_time": "2024-06-01T08:00:00Z",
            "delivery_time": "2024-06-01T14:00:00Z",
            "package_type": "Pallet",
            "quantity": 3
        })
    }

    #[test]
    fn coordinates_outside_the_globe_are_rejected() {
        let mut payload = base_payload();
        payload["pickup_latitude"] = json!(91.0);
        let input: CreateDeliveryInput = serde_json::from_value(payload).unwrap();
        assert!(input.validate().is_err());

        let mut payload = base_payload();
        payload["dropoff_longitude"] = json!(-180.0);
        let input: CreateDeliveryInput = serde_json::from_value(payload).unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn quantity_must_be_positive() {
        let mut payload = base_payload();
        payload["quantity"] = json!(0);
        let input: CreateDeliveryInput = serde_json::from_value(payload).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn status_is_optional_on_create() {
        let input: CreateDeliveryInput = serde_json::from_value(base_payload()).unwrap();
        assert_eq!(input.status.unwrap_or_default(), DeliveryStatus::Pending);
    }
}
