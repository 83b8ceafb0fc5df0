use crate::{
    db::DbPool,
    entities::warehouse,
    errors::ServiceError,
    services::{
        identifiers::{insert_with_retry, next_warehouse_id},
        page_bounds, Page,
    },
};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWarehouseInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "province is required"))]
    pub province: String,
    pub postal_code: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub bulky_capacity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub hazardous_capacity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub perishable_capacity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub spare_parts_capacity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub other_capacity: i32,
}

/// Fields left out are kept as stored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouseInput {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(length(min = 1))]
    pub city: Option<String>,
    #[validate(length(min = 1))]
    pub province: Option<String>,
    pub postal_code: Option<String>,
    #[validate(range(min = 0))]
    pub bulky_capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub hazardous_capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub perishable_capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub spare_parts_capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub other_capacity: Option<i32>,
}

/// Warehouse records and `WH` identifier allocation
#[derive(Clone)]
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
    id_max_attempts: u32,
}

impl WarehouseService {
    pub fn new(db_pool: Arc<DbPool>, id_max_attempts: u32) -> Self {
        Self {
            db_pool,
            id_max_attempts,
        }
    }

    /// Creates a warehouse under the next free `WH` number.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_warehouse(
        &self,
        input: CreateWarehouseInput,
    ) -> Result<warehouse::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let created = insert_with_retry("warehouse", self.id_max_attempts, |_| {
            let input = input.clone();
            async move {
                let existing: Vec<String> = warehouse::Entity::find()
                    .select_only()
                    .column(warehouse::Column::WarehouseId)
                    .into_tuple()
                    .all(db)
                    .await?;
                let warehouse_id = next_warehouse_id(existing.iter().map(String::as_str));

                warehouse::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    warehouse_id: Set(warehouse_id),
                    name: Set(input.name),
                    address: Set(input.address),
                    city: Set(input.city),
                    province: Set(input.province),
                    postal_code: Set(input.postal_code),
                    bulky_capacity: Set(input.bulky_capacity),
                    hazardous_capacity: Set(input.hazardous_capacity),
                    perishable_capacity: Set(input.perishable_capacity),
                    spare_parts_capacity: Set(input.spare_parts_capacity),
                    other_capacity: Set(input.other_capacity),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        })
        .await?;

        counter!("logistics_records.created", 1, "entity" => "warehouse");
        info!(warehouse_id = %created.warehouse_id, "warehouse created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_warehouse(&self, warehouse_id: &str) -> Result<warehouse::Model, ServiceError> {
        warehouse::Entity::find()
            .filter(warehouse::Column::WarehouseId.eq(warehouse_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Warehouse", warehouse_id))
    }

    /// Lists warehouses oldest first; rows created in the same instant fall back
    /// to `warehouse_id`.
    #[instrument(skip(self))]
    pub async fn list_warehouses(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<warehouse::Model>, ServiceError> {
        let (page, per_page) = page_bounds(page, per_page)?;
        let paginator = warehouse::Entity::find()
            .order_by_asc(warehouse::Column::CreatedAt)
            .order_by_asc(warehouse::Column::WarehouseId)
            .paginate(&*self.db_pool, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_warehouse(
        &self,
        warehouse_id: &str,
        input: UpdateWarehouseInput,
    ) -> Result<warehouse::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_warehouse(warehouse_id).await?;

        let mut active: warehouse::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(province) = input.province {
            active.province = Set(province);
        }
        if let Some(postal_code) = input.postal_code {
            active.postal_code = Set(Some(postal_code));
        }
        if let Some(capacity) = input.bulky_capacity {
            active.bulky_capacity = Set(capacity);
        }
        if let Some(capacity) = input.hazardous_capacity {
            active.hazardous_capacity = Set(capacity);
        }
        if let Some(capacity) = input.perishable_capacity {
            active.perishable_capacity = Set(capacity);
        }
        if let Some(capacity) = input.spare_parts_capacity {
            active.spare_parts_capacity = Set(capacity);
        }
        if let Some(capacity) = input.other_capacity {
            active.other_capacity = Set(capacity);
        }

        let updated = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        info!(warehouse_id, "warehouse updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_warehouse(&self, warehouse_id: &str) -> Result<(), ServiceError> {
        let result = warehouse::Entity::delete_many()
            .filter(warehouse::Column::WarehouseId.eq(warehouse_id))
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Warehouse", warehouse_id));
        }
        info!(warehouse_id, "warehouse deleted");
        Ok(())
    }
}
