//! Migration: Create reports table.
//!
//! One row per NGO per month. The unique `(ngo_id, month)` index is what makes
//! report submission idempotent, including under concurrent imports.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Key columns are unbounded text: the validator accepts any non-empty value.
fn reports_table() -> TableCreateStatement {
    Table::create()
        .table(Reports::Table)
        .if_not_exists()
        .col(ColumnDef::new(Reports::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Reports::NgoId).text().not_null())
        .col(ColumnDef::new(Reports::Month).text().not_null())
        .col(
            ColumnDef::new(Reports::PeopleHelped)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Reports::EventsConducted)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Reports::FundsUtilized)
                .double()
                .not_null()
                .default(0.0),
        )
        .col(
            ColumnDef::new(Reports::Region)
                .string_len(10)
                .not_null()
                .default("South"),
        )
        // Back-reference only; no foreign key so jobs never cascade into reports
        .col(ColumnDef::new(Reports::JobId).uuid().null())
        .col(
            ColumnDef::new(Reports::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Reports::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(reports_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_ngo_id_month")
                    .table(Reports::Table)
                    .col(Reports::NgoId)
                    .col(Reports::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_job_id")
                    .table(Reports::Table)
                    .col(Reports::JobId)
                    .to_owned(),
            )
            .await?;

        // Dashboard filters by month and region
        manager
            .create_index(
                Index::create()
                    .name("idx_reports_month_region")
                    .table(Reports::Table)
                    .col(Reports::Month)
                    .col(Reports::Region)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    NgoId,
    Month,
    PeopleHelped,
    EventsConducted,
    FundsUtilized,
    Region,
    JobId,
    CreatedAt,
    UpdatedAt,
}
