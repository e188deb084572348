use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::FullName).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string().null())
                    .col(ColumnDef::new(Customers::Address).text().null())
                    .col(ColumnDef::new(Customers::CreatedByTechnician).uuid().null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Repairs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Repairs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Repairs::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Repairs::CustomerName).string().not_null())
                    .col(ColumnDef::new(Repairs::DeviceType).string().not_null())
                    .col(ColumnDef::new(Repairs::Brand).string().not_null())
                    .col(ColumnDef::new(Repairs::Model).string().not_null())
                    .col(ColumnDef::new(Repairs::Description).text().not_null())
                    .col(ColumnDef::new(Repairs::Priority).string().not_null())
                    .col(ColumnDef::new(Repairs::Status).string().not_null())
                    .col(ColumnDef::new(Repairs::AssignedTechnicianId).uuid().null())
                    .col(ColumnDef::new(Repairs::AssignedTechnicianName).string().null())
                    .col(ColumnDef::new(Repairs::Images).text().not_null())
                    .col(ColumnDef::new(Repairs::CostEstimate).double().null())
                    .col(ColumnDef::new(Repairs::FinalCost).double().null())
                    .col(ColumnDef::new(Repairs::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Repairs::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Repairs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Repairs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Repairs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repairs_customer")
                            .from(Repairs::Table, Repairs::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_repairs_assigned", Repairs::AssignedTechnicianId),
            ("idx_repairs_created_by", Repairs::CreatedBy),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Repairs::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Repairs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Phone,
    Role,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    FullName,
    Phone,
    Email,
    Address,
    CreatedByTechnician,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Repairs {
    Table,
    Id,
    CustomerId,
    CustomerName,
    DeviceType,
    Brand,
    Model,
    Description,
    Priority,
    Status,
    AssignedTechnicianId,
    AssignedTechnicianName,
    Images,
    CostEstimate,
    FinalCost,
    PaymentStatus,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}
