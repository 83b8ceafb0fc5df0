use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_warehouses_table::Migration),
            Box::new(m20240601_000002_create_vehicles_table::Migration),
            Box::new(m20240601_000003_create_maintenance_records_table::Migration),
            Box::new(m20240601_000004_create_delivery_schedules_table::Migration),
            Box::new(m20240601_000005_create_inventory_items_table::Migration),
        ]
    }
}

async fn create_unique_index<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    col: C,
) -> Result<(), DbErr>
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name(name)
                .table(table)
                .col(col)
                .unique()
                .to_owned(),
        )
        .await
}

mod m20240601_000001_create_warehouses_table {
    use super::create_unique_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Warehouses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Warehouses::WarehouseId).string_len(16).not_null())
                        .col(ColumnDef::new(Warehouses::Name).string().not_null())
                        .col(ColumnDef::new(Warehouses::Address).string().not_null())
                        .col(ColumnDef::new(Warehouses::City).string().not_null())
                        .col(ColumnDef::new(Warehouses::Province).string().not_null())
                        .col(ColumnDef::new(Warehouses::PostalCode).string().null())
                        .col(
                            ColumnDef::new(Warehouses::BulkyCapacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Warehouses::HazardousCapacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Warehouses::PerishableCapacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Warehouses::SparePartsCapacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Warehouses::OtherCapacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Warehouses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            create_unique_index(
                manager,
                "idx_warehouses_warehouse_id",
                Warehouses::Table,
                Warehouses::WarehouseId,
            )
            .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Warehouses {
        Table,
        Id,
        WarehouseId,
        Name,
        Address,
        City,
        Province,
        PostalCode,
        BulkyCapacity,
        HazardousCapacity,
        PerishableCapacity,
        SparePartsCapacity,
        OtherCapacity,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000002_create_vehicles_table {
    use super::create_unique_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_vehicles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vehicles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vehicles::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Vehicles::OwnerName).string().not_null())
                        .col(ColumnDef::new(Vehicles::OwnerNic).string_len(32).not_null())
                        .col(ColumnDef::new(Vehicles::OwnerContact).string().not_null())
                        .col(
                            ColumnDef::new(Vehicles::RegistrationNumber)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Vehicles::VehicleType).string().not_null())
                        .col(ColumnDef::new(Vehicles::Make).string().not_null())
                        .col(ColumnDef::new(Vehicles::Model).string().not_null())
                        .col(ColumnDef::new(Vehicles::ManufactureYear).integer().null())
                        .col(
                            ColumnDef::new(Vehicles::LoadCapacity)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Vehicles::DriverId).string().null())
                        .col(ColumnDef::new(Vehicles::MaintenanceRecords).json().not_null())
                        .col(
                            ColumnDef::new(Vehicles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            create_unique_index(
                manager,
                "idx_vehicles_registration_number",
                Vehicles::Table,
                Vehicles::RegistrationNumber,
            )
            .await?;
            create_unique_index(
                manager,
                "idx_vehicles_owner_nic",
                Vehicles::Table,
                Vehicles::OwnerNic,
            )
            .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Vehicles {
        Table,
        Id,
        OwnerName,
        OwnerNic,
        OwnerContact,
        RegistrationNumber,
        VehicleType,
        Make,
        Model,
        ManufactureYear,
        LoadCapacity,
        DriverId,
        MaintenanceRecords,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000003_create_maintenance_records_table {
    use super::create_unique_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_maintenance_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // No foreign key to vehicles: records outlive the vehicle they reference.
            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::MaintenanceId)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::RegistrationNumber)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::MaintenanceDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::MaintenanceType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::Cost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(MaintenanceRecords::Description).text().null())
                        .col(
                            ColumnDef::new(MaintenanceRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            create_unique_index(
                manager,
                "idx_maintenance_records_maintenance_id",
                MaintenanceRecords::Table,
                MaintenanceRecords::MaintenanceId,
            )
            .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_records_registration_number")
                        .table(MaintenanceRecords::Table)
                        .col(MaintenanceRecords::RegistrationNumber)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MaintenanceRecords {
        Table,
        Id,
        MaintenanceId,
        RegistrationNumber,
        MaintenanceDate,
        MaintenanceType,
        Cost,
        Description,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000004_create_delivery_schedules_table {
    use super::create_unique_index;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_delivery_schedules_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliverySchedules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliverySchedules::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliverySchedules::DeliveryId)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliverySchedules::PickupAddress).string().not_null())
                        .col(ColumnDef::new(DeliverySchedules::PickupLatitude).double().null())
                        .col(ColumnDef::new(DeliverySchedules::PickupLongitude).double().null())
                        .col(ColumnDef::new(DeliverySchedules::DropoffAddress).string().not_null())
                        .col(ColumnDef::new(DeliverySchedules::DropoffLatitude).double().null())
                        .col(ColumnDef::new(DeliverySchedules::DropoffLongitude).double().null())
                        .col(
                            ColumnDef::new(DeliverySchedules::PickupTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliverySchedules::DeliveryTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliverySchedules::PackageType).string().not_null())
                        .col(ColumnDef::new(DeliverySchedules::Quantity).integer().not_null())
                        .col(ColumnDef::new(DeliverySchedules::VehicleId).string().null())
                        .col(ColumnDef::new(DeliverySchedules::DriverId).string().null())
                        .col(ColumnDef::new(DeliverySchedules::SpecialInstructions).text().null())
                        .col(
                            ColumnDef::new(DeliverySchedules::Status)
                                .string_len(16)
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(DeliverySchedules::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliverySchedules::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            create_unique_index(
                manager,
                "idx_delivery_schedules_delivery_id",
                DeliverySchedules::Table,
                DeliverySchedules::DeliveryId,
            )
            .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_delivery_schedules_pickup_time")
                        .table(DeliverySchedules::Table)
                        .col(DeliverySchedules::PickupTime)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliverySchedules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DeliverySchedules {
        Table,
        Id,
        DeliveryId,
        PickupAddress,
        PickupLatitude,
        PickupLongitude,
        DropoffAddress,
        DropoffLatitude,
        DropoffLongitude,
        PickupTime,
        DeliveryTime,
        PackageType,
        Quantity,
        VehicleId,
        DriverId,
        SpecialInstructions,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000005_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(InventoryItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(InventoryItems::ProductName).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Brand).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Category).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Description).text().null())
                        .col(
                            ColumnDef::new(InventoryItems::Price)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventoryItems::SupplierName).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::ExpiryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_category")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        ProductName,
        Brand,
        Category,
        Description,
        Price,
        Quantity,
        SupplierName,
        ExpiryDate,
        CreatedAt,
        UpdatedAt,
    }
}
