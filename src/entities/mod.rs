//! SeaORM entities, one per table.

pub mod delivery_schedule;
pub mod inventory_item;
pub mod maintenance_record;
pub mod vehicle;
pub mod warehouse;
