use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_vendors_table::Vendors;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000003_create_historical_performances_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HistoricalPerformances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HistoricalPerformances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HistoricalPerformances::VendorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoricalPerformances::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoricalPerformances::OnTimeDeliveryRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoricalPerformances::QualityRatingAvg)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoricalPerformances::AverageResponseTime)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoricalPerformances::FulfillmentRate)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_historical_performances_vendor_id")
                            .from(
                                HistoricalPerformances::Table,
                                HistoricalPerformances::VendorId,
                            )
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_historical_performances_vendor_date")
                    .table(HistoricalPerformances::Table)
                    .col(HistoricalPerformances::VendorId)
                    .col(HistoricalPerformances::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HistoricalPerformances::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HistoricalPerformances {
    Table,
    Id,
    VendorId,
    Date,
    OnTimeDeliveryRate,
    QualityRatingAvg,
    AverageResponseTime,
    FulfillmentRate,
}
