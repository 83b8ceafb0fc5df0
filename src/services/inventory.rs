use crate::{
    db::DbPool,
    entities::inventory_item,
    errors::ServiceError,
    services::{page_bounds, validate_non_negative, Page},
};
use chrono::{DateTime, Duration, Utc};
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Default `threshold` for the low-stock listing
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;
/// Default look-ahead for the expiring listing
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemInput {
    #[validate(length(min = 1, message = "product_name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    #[validate(length(min = 1, message = "supplier_name is required"))]
    pub supplier_name: String,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryItemInput {
    #[validate(length(min = 1))]
    pub product_name: Option<String>,
    #[validate(length(min = 1))]
    pub brand: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[validate(length(min = 1))]
    pub supplier_name: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Body of a stockout request. `quantity` is kept raw so numeric strings are accepted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StockoutRequest {
    #[serde(default)]
    #[schema(value_type = i32, example = 5)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryFilter {
    pub category: Option<String>,
}

/// Parses a stockout quantity: a JSON number or numeric string holding a whole
/// number greater than zero.
pub fn parse_stockout_quantity(raw: Option<&Value>) -> Result<i32, ServiceError> {
    let invalid = || {
        ServiceError::BadRequest("quantity must be a whole number greater than zero".to_string())
    };

    let quantity = match raw.ok_or_else(invalid)? {
        Value::Number(n) => match n.as_i64() {
            Some(whole) => whole,
            None => whole_from_f64(n.as_f64().ok_or_else(invalid)?).ok_or_else(invalid)?,
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(whole) => whole,
                Err(_) => whole_from_f64(s.parse::<f64>().map_err(|_| invalid())?)
                    .ok_or_else(invalid)?,
            }
        }
        _ => return Err(invalid()),
    };

    if quantity <= 0 {
        return Err(invalid());
    }
    i32::try_from(quantity).map_err(|_| invalid())
}

fn whole_from_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input), fields(product_name = %input.product_name))]
    pub async fn create_item(
        &self,
        input: CreateInventoryItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        input.validate()?;

        let created = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_name: Set(input.product_name),
            brand: Set(input.brand),
            category: Set(input.category),
            description: Set(input.description),
            price: Set(input.price),
            quantity: Set(input.quantity),
            supplier_name: Set(input.supplier_name),
            expiry_date: Set(input.expiry_date),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        counter!("logistics_records.created", 1, "entity" => "inventory_item");
        info!(item_id = %created.id, quantity = created.quantity, "inventory item created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> Result<inventory_item::Model, ServiceError> {
        inventory_item::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Inventory item", id))
    }

    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        filter: InventoryFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<inventory_item::Model>, ServiceError> {
        let (page, per_page) = page_bounds(page, per_page)?;

        let mut query = inventory_item::Entity::find();
        if let Some(category) = filter.category {
            query = query.filter(inventory_item::Column::Category.eq(category));
        }

        let paginator = query
            .order_by_asc(inventory_item::Column::ProductName)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    /// Items whose quantity is strictly below `threshold`, lowest first.
    #[instrument(skip(self))]
    pub async fn list_low_stock(
        &self,
        threshold: i32,
        page: u64,
        per_page: u64,
    ) -> Result<Page<inventory_item::Model>, ServiceError> {
        if threshold < 0 {
            return Err(ServiceError::BadRequest(
                "threshold must not be negative".to_string(),
            ));
        }
        let (page, per_page) = page_bounds(page, per_page)?;

        let paginator = inventory_item::Entity::find()
            .filter(inventory_item::Column::Quantity.lt(threshold))
            .order_by_asc(inventory_item::Column::Quantity)
            .order_by_asc(inventory_item::Column::ProductName)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    /// Items with an expiry date at or before `before`, including ones already
    /// expired. Defaults to thirty days from now.
    #[instrument(skip(self))]
    pub async fn list_expiring(
        &self,
        before: Option<DateTime<Utc>>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<inventory_item::Model>, ServiceError> {
        let before =
            before.unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_EXPIRY_WINDOW_DAYS));
        let (page, per_page) = page_bounds(page, per_page)?;

        let paginator = inventory_item::Entity::find()
            .filter(inventory_item::Column::ExpiryDate.is_not_null())
            .filter(inventory_item::Column::ExpiryDate.lte(before))
            .order_by_asc(inventory_item::Column::ExpiryDate)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok(Page::new(items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        id: Uuid,
        input: UpdateInventoryItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_item(id).await?;

        let mut active: inventory_item::ActiveModel = existing.into();
        if let Some(product_name) = input.product_name {
            active.product_name = Set(product_name);
        }
        if let Some(brand) = input.brand {
            active.brand = Set(brand);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(quantity) = input.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(supplier_name) = input.supplier_name {
            active.supplier_name = Set(supplier_name);
        }
        if let Some(expiry_date) = input.expiry_date {
            active.expiry_date = Set(Some(expiry_date));
        }

        let updated = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        info!(item_id = %id, "inventory item updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = inventory_item::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Inventory item", id));
        }
        info!(item_id = %id, "inventory item deleted");
        Ok(())
    }

    /// Removes `quantity` units from stock.
    ///
    /// The decrement is one conditional UPDATE guarded by `quantity >= n`, so
    /// concurrent stockouts can never drive the stored quantity below zero.
    #[instrument(skip(self))]
    pub async fn stockout(
        &self,
        id: Uuid,
        quantity: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::BadRequest(
                "quantity must be a whole number greater than zero".to_string(),
            ));
        }
        let db = &*self.db_pool;
        let start = std::time::Instant::now();

        let current = self.get_item(id).await?;
        if quantity > current.quantity {
            return Err(insufficient_stock(quantity, current.quantity));
        }

        let result = inventory_item::Entity::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).sub(quantity),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(inventory_item::Column::Id.eq(id))
            .filter(inventory_item::Column::Quantity.gte(quantity))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            // Stock moved (or the item vanished) between the read and the update.
            let latest = self.get_item(id).await?;
            warn!(item_id = %id, requested = quantity, available = latest.quantity, "stockout lost a race");
            return Err(insufficient_stock(quantity, latest.quantity));
        }

        let updated = self.get_item(id).await?;
        counter!("logistics_inventory.stockouts", 1);
        histogram!("logistics_inventory.stockout_duration", start.elapsed());
        info!(
            item_id = %id,
            removed = quantity,
            remaining = updated.quantity,
            "stock removed"
        );
        Ok(updated)
    }
}

fn insufficient_stock(requested: i32, available: i32) -> ServiceError {
    ServiceError::BadRequest(format!(
        "requested quantity {} exceeds available stock {}",
        requested, available
    ))
}
