//! Database migrations for the object registry

use sea_orm_migration::prelude::*;

/// Applies the registry schema in order; each migration name is its
/// `seaql_migrations` version key and must be unique
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference_tables::Migration),
            Box::new(m20250301_000002_create_objects::Migration),
            Box::new(m20250301_000003_create_priority_records::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Regions {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum ResourceTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum WaterTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Objects {
    Table,
    Id,
    Name,
    RegionId,
    ResourceTypeId,
    WaterTypeId,
    Fauna,
    PassportDate,
    TechnicalCondition,
    Latitude,
    Longitude,
    Document,
    Priority,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PriorityRecords {
    Table,
    Id,
    ObjectId,
    Score,
    Level,
    FormulaVersion,
    UpdatedAt,
}

mod m20250301_000001_create_reference_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_reference_tables"
        }
    }

    fn lookup_table<T: Iden + 'static>(table: T, id: T, name: T) -> TableCreateStatement {
        Table::create()
            .table(table)
            .if_not_exists()
            .col(
                ColumnDef::new(id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(name).string_len(100).not_null())
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(lookup_table(Regions::Table, Regions::Id, Regions::Name))
                .await?;
            manager
                .create_table(lookup_table(
                    ResourceTypes::Table,
                    ResourceTypes::Id,
                    ResourceTypes::Name,
                ))
                .await?;
            manager
                .create_table(lookup_table(
                    WaterTypes::Table,
                    WaterTypes::Id,
                    WaterTypes::Name,
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WaterTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ResourceTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Regions::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_objects {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_objects"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Objects::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Objects::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Objects::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Objects::RegionId).integer().not_null())
                        .col(ColumnDef::new(Objects::ResourceTypeId).integer().not_null())
                        .col(ColumnDef::new(Objects::WaterTypeId).integer().not_null())
                        .col(
                            ColumnDef::new(Objects::Fauna)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Objects::PassportDate).date().not_null())
                        .col(
                            ColumnDef::new(Objects::TechnicalCondition)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Objects::Latitude).decimal_len(9, 6))
                        .col(ColumnDef::new(Objects::Longitude).decimal_len(9, 6))
                        .col(ColumnDef::new(Objects::Document).string())
                        .col(
                            ColumnDef::new(Objects::Priority)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Objects::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_objects_region")
                                .from(Objects::Table, Objects::RegionId)
                                .to(Regions::Table, Regions::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_objects_resource_type")
                                .from(Objects::Table, Objects::ResourceTypeId)
                                .to(ResourceTypes::Table, ResourceTypes::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_objects_water_type")
                                .from(Objects::Table, Objects::WaterTypeId)
                                .to(WaterTypes::Table, WaterTypes::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_objects_region_id")
                        .table(Objects::Table)
                        .col(Objects::RegionId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Objects::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000003_create_priority_records {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_priority_records"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PriorityRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PriorityRecords::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        // One record per object, enforced by storage
                        .col(
                            ColumnDef::new(PriorityRecords::ObjectId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PriorityRecords::Score)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PriorityRecords::Level)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriorityRecords::FormulaVersion)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriorityRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_priority_records_object")
                                .from(PriorityRecords::Table, PriorityRecords::ObjectId)
                                .to(Objects::Table, Objects::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PriorityRecords::Table).to_owned())
                .await
        }
    }
}
