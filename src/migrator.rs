use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_master_data_tables::Migration),
            Box::new(m20240101_000002_create_trips_table::Migration),
            Box::new(m20240101_000003_create_trip_ledger_tables::Migration),
            Box::new(m20240101_000004_create_expenses_table::Migration),
        ]
    }
}

mod m20240101_000001_create_master_data_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_master_data_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Suppliers::UserId).uuid().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactNumber).string().null())
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Trucks::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Trucks::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Trucks::UserId).uuid().not_null())
                        .col(ColumnDef::new(Trucks::TruckNo).string().not_null())
                        .col(ColumnDef::new(Trucks::Ownership).string().not_null())
                        .col(ColumnDef::new(Trucks::SupplierId).uuid().null())
                        .col(ColumnDef::new(Trucks::Model).string().null())
                        .col(ColumnDef::new(Trucks::Capacity).string().null())
                        .col(
                            ColumnDef::new(Trucks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trucks_supplier_id")
                                .from(Trucks::Table, Trucks::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_trucks_user_truck_no")
                        .table(Trucks::Table)
                        .col(Trucks::UserId)
                        .col(Trucks::TruckNo)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Drivers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Drivers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Drivers::UserId).uuid().not_null())
                        .col(ColumnDef::new(Drivers::Name).string().not_null())
                        .col(ColumnDef::new(Drivers::ContactNumber).string().null())
                        .col(ColumnDef::new(Drivers::LicenseNo).string().null())
                        .col(
                            ColumnDef::new(Drivers::Status)
                                .string()
                                .not_null()
                                .default("Available"),
                        )
                        .col(
                            ColumnDef::new(Drivers::Balance)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Drivers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Parties::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Parties::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Parties::UserId).uuid().not_null())
                        .col(ColumnDef::new(Parties::Name).string().not_null())
                        .col(ColumnDef::new(Parties::ContactPerson).string().null())
                        .col(ColumnDef::new(Parties::ContactNumber).string().null())
                        .col(ColumnDef::new(Parties::Address).string().null())
                        .col(ColumnDef::new(Parties::GstNumber).string().null())
                        .col(
                            ColumnDef::new(Parties::CreatedAt)
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
                        .name("idx_drivers_user_id")
                        .table(Drivers::Table)
                        .col(Drivers::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parties_user_id")
                        .table(Parties::Table)
                        .col(Parties::UserId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Parties::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Drivers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Trucks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        Id,
        UserId,
        Name,
        ContactNumber,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Trucks {
        Table,
        Id,
        UserId,
        TruckNo,
        Ownership,
        SupplierId,
        Model,
        Capacity,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Drivers {
        Table,
        Id,
        UserId,
        Name,
        ContactNumber,
        LicenseNo,
        Status,
        Balance,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Parties {
        Table,
        Id,
        UserId,
        Name,
        ContactPerson,
        ContactNumber,
        Address,
        GstNumber,
        CreatedAt,
    }
}

mod m20240101_000002_create_trips_table {
    use super::m20240101_000001_create_master_data_tables::{Drivers, Parties, Suppliers, Trucks};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_trips_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Trips::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Trips::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Trips::UserId).uuid().not_null())
                        .col(ColumnDef::new(Trips::TripId).string().not_null())
                        .col(ColumnDef::new(Trips::TruckId).uuid().not_null())
                        .col(ColumnDef::new(Trips::DriverId).uuid().not_null())
                        .col(ColumnDef::new(Trips::PartyId).uuid().not_null())
                        .col(ColumnDef::new(Trips::SupplierId).uuid().null())
                        .col(ColumnDef::new(Trips::RouteFrom).string().not_null())
                        .col(ColumnDef::new(Trips::RouteTo).string().not_null())
                        .col(ColumnDef::new(Trips::BillingType).string().not_null())
                        .col(ColumnDef::new(Trips::Amount).decimal().not_null().default(0))
                        .col(
                            ColumnDef::new(Trips::TruckHireCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Trips::Status)
                                .small_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Trips::StartDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Trips::CompletedDate).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Trips::PodReceivedDate).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Trips::PodSubmittedDate).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Trips::SettlementDate).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Trips::LrNumber).string().null())
                        .col(ColumnDef::new(Trips::Material).string().null())
                        .col(ColumnDef::new(Trips::Notes).string().null())
                        .col(
                            ColumnDef::new(Trips::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Trips::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trips_truck_id")
                                .from(Trips::Table, Trips::TruckId)
                                .to(Trucks::Table, Trucks::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trips_driver_id")
                                .from(Trips::Table, Trips::DriverId)
                                .to(Drivers::Table, Drivers::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trips_party_id")
                                .from(Trips::Table, Trips::PartyId)
                                .to(Parties::Table, Parties::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trips_supplier_id")
                                .from(Trips::Table, Trips::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_trips_user_trip_id")
                        .table(Trips::Table)
                        .col(Trips::UserId)
                        .col(Trips::TripId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_trips_user_start_date")
                        .table(Trips::Table)
                        .col(Trips::UserId)
                        .col(Trips::StartDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_trips_party_id")
                        .table(Trips::Table)
                        .col(Trips::PartyId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Trips::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Trips {
        Table,
        Id,
        UserId,
        TripId,
        TruckId,
        DriverId,
        PartyId,
        SupplierId,
        RouteFrom,
        RouteTo,
        BillingType,
        Amount,
        TruckHireCost,
        Status,
        StartDate,
        CompletedDate,
        PodReceivedDate,
        PodSubmittedDate,
        SettlementDate,
        LrNumber,
        Material,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_trip_ledger_tables {
    use super::m20240101_000002_create_trips_table::Trips;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_trip_ledger_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TripExpenses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(TripExpenses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(TripExpenses::TripId).uuid().not_null())
                        .col(ColumnDef::new(TripExpenses::UserId).uuid().not_null())
                        .col(ColumnDef::new(TripExpenses::Amount).decimal().null())
                        .col(ColumnDef::new(TripExpenses::PartyBill).boolean().null())
                        .col(ColumnDef::new(TripExpenses::ExpenseType).string().not_null())
                        .col(
                            ColumnDef::new(TripExpenses::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TripExpenses::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_trip_expenses_trip_id")
                                .from(TripExpenses::Table, TripExpenses::TripId)
                                .to(Trips::Table, Trips::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_trip_expenses_trip_id")
                        .table(TripExpenses::Table)
                        .col(TripExpenses::TripId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentBooks::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PaymentBooks::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(PaymentBooks::TripId).uuid().not_null())
                        .col(ColumnDef::new(PaymentBooks::UserId).uuid().not_null())
                        .col(ColumnDef::new(PaymentBooks::Amount).decimal().null())
                        .col(ColumnDef::new(PaymentBooks::AccountType).string().not_null())
                        .col(ColumnDef::new(PaymentBooks::PaymentType).string().not_null())
                        .col(
                            ColumnDef::new(PaymentBooks::ReceivedByDriver)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PaymentBooks::PaymentDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentBooks::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payment_books_trip_id")
                                .from(PaymentBooks::Table, PaymentBooks::TripId)
                                .to(Trips::Table, Trips::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payment_books_trip_id")
                        .table(PaymentBooks::Table)
                        .col(PaymentBooks::TripId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentBooks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TripExpenses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TripExpenses {
        Table,
        Id,
        TripId,
        UserId,
        Amount,
        PartyBill,
        ExpenseType,
        Date,
        Notes,
    }

    #[derive(DeriveIden)]
    enum PaymentBooks {
        Table,
        Id,
        TripId,
        UserId,
        Amount,
        AccountType,
        PaymentType,
        ReceivedByDriver,
        PaymentDate,
        Notes,
    }
}

mod m20240101_000004_create_expenses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_expenses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Expenses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Expenses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Expenses::UserId).uuid().not_null())
                        .col(ColumnDef::new(Expenses::Category).string().not_null())
                        .col(ColumnDef::new(Expenses::TruckId).uuid().null())
                        .col(ColumnDef::new(Expenses::TripId).uuid().null())
                        .col(ColumnDef::new(Expenses::ExpenseType).string().not_null())
                        .col(ColumnDef::new(Expenses::Amount).decimal().not_null())
                        .col(ColumnDef::new(Expenses::PaymentMode).string().not_null())
                        .col(
                            ColumnDef::new(Expenses::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Expenses::Notes).string().null())
                        .to_owned(),
                )
                .await?;

            // Report and profit queries filter by owner, category and date range.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_expenses_user_category_date")
                        .table(Expenses::Table)
                        .col(Expenses::UserId)
                        .col(Expenses::Category)
                        .col(Expenses::Date)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_expenses_truck_id")
                        .table(Expenses::Table)
                        .col(Expenses::TruckId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Expenses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Expenses {
        Table,
        Id,
        UserId,
        Category,
        TruckId,
        TripId,
        ExpenseType,
        Amount,
        PaymentMode,
        Date,
        Notes,
    }
}
