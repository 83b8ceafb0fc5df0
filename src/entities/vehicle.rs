use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ActiveValue::Set, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Ordered list of `maintenance_id`s attached to a vehicle, stored as a JSON array.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct MaintenanceRefs(pub Vec<String>);

impl MaintenanceRefs {
    pub fn contains(&self, maintenance_id: &str) -> bool {
        self.0.iter().any(|id| id == maintenance_id)
    }

    /// Appends `maintenance_id` unless it is already listed.
    pub fn push(&mut self, maintenance_id: impl Into<String>) {
        let maintenance_id = maintenance_id.into();
        if !self.contains(&maintenance_id) {
            self.0.push(maintenance_id);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Vehicle)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_name: String,
    /// Owner national identity card number
    #[sea_orm(unique)]
    pub owner_nic: String,
    pub owner_contact: String,
    #[sea_orm(unique)]
    pub registration_number: String,
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub manufacture_year: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub load_capacity: Decimal,
    pub driver_id: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub maintenance_records: MaintenanceRefs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}
