use crate::{
    db::DbPool,
    entities::maintenance_record,
    errors::ServiceError,
    services::{
        identifiers::{generate_short_id, insert_with_retry, MAINTENANCE_ID_PREFIX},
        page_bounds, validate_non_negative,
        vehicles::append_maintenance_ref,
        Page,
    },
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceInput {
    #[validate(length(min = 1, message = "registration_number is required"))]
    pub registration_number: String,
    pub maintenance_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "maintenance_type is required"))]
    pub maintenance_type: String,
    #[validate(custom = "validate_non_negative")]
    pub cost: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceFilter {
    /// Only records for this vehicle
    pub registration_number: Option<String>,
    /// Only records dated on or after this instant
    pub since: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct MaintenanceService {
    db_pool: Arc<DbPool>,
    id_max_attempts: u32,
}

impl MaintenanceService {
    pub fn new(db_pool: Arc<DbPool>, id_max_attempts: u32) -> Self {
        Self {
            db_pool,
            id_max_attempts,
        }
    }

    /// Records a maintenance event, then lists its id on the vehicle.
    ///
    /// The two writes are independent. A missing vehicle or a failed append is
    /// logged and the created record is still returned.
    #[instrument(skip(self, input), fields(registration_number = %input.registration_number))]
    pub async fn create_maintenance(
        &self,
        input: CreateMaintenanceInput,
    ) -> Result<maintenance_record::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let record = insert_with_retry("maintenance", self.id_max_attempts, |_| {
            let input = input.clone();
            async move {
                maintenance_record::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    maintenance_id: Set(generate_short_id(MAINTENANCE_ID_PREFIX)),
                    registration_number: Set(input.registration_number),
                    maintenance_date: Set(input.maintenance_date),
                    maintenance_type: Set(input.maintenance_type),
                    cost: Set(input.cost),
                    description: Set(input.description),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        })
        .await?;
        counter!("logistics_records.created", 1, "entity" => "maintenance");

        match append_maintenance_ref(db, &record.registration_number, &record.maintenance_id).await
        {
            Ok(true) => info!(maintenance_id = %record.maintenance_id, "maintenance linked to vehicle"),
            Ok(false) => warn!(
                maintenance_id = %record.maintenance_id,
                "no vehicle with this registration number, maintenance left unlinked"
            ),
            Err(e) => {
                counter!("logistics_maintenance.link_failures", 1);
                error!(
                    maintenance_id = %record.maintenance_id,
                    error = %e,
                    "failed to link maintenance to vehicle"
                );
            }
        }

        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn get_maintenance(
        &self,
        maintenance_id: &str,
    ) -> Result<maintenance_record::Model, ServiceError> {
        maintenance_record::Entity::find()
            .filter(maintenance_record::Column::MaintenanceId.eq(maintenance_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Maintenance record", maintenance_id))
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_maintenance(
        &self,
        filter: MaintenanceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<maintenance_record::Model>, ServiceError> {
        let (page, per_page) = page_bounds(page, per_page)?;

        let mut query = maintenance_record::Entity::find();
        if let Some(registration_number) = filter.registration_number {
            query = query
                .filter(maintenance_record::Column::RegistrationNumber.eq(registration_number));
        }
        if let Some(since) = filter.since {
            query = query.filter(maintenance_record::Column::MaintenanceDate.gte(since));
        }

        let paginator = query
            .order_by_desc(maintenance_record::Column::MaintenanceDate)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    /// Deletes the record. Vehicles that list its id keep the stale reference.
    #[instrument(skip(self))]
    pub async fn delete_maintenance(&self, maintenance_id: &str) -> Result<(), ServiceError> {
        let result = maintenance_record::Entity::delete_many()
            .filter(maintenance_record::Column::MaintenanceId.eq(maintenance_id))
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Maintenance record", maintenance_id));
        }
        info!(maintenance_id, "maintenance record deleted");
        Ok(())
    }
}
