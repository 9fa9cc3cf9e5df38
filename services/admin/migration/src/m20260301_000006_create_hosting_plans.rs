use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HostingPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HostingPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HostingPlans::Name).string().not_null())
                    .col(ColumnDef::new(HostingPlans::Description).text().not_null())
                    .col(
                        ColumnDef::new(HostingPlans::MonthlyPriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(HostingPlans::YearlyPriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HostingPlans::Features).json_binary().not_null())
                    .col(ColumnDef::new(HostingPlans::StripeProductId).string())
                    .col(ColumnDef::new(HostingPlans::StripePriceIdMonthly).string())
                    .col(ColumnDef::new(HostingPlans::StripePriceIdYearly).string())
                    .col(
                        ColumnDef::new(HostingPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HostingPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HostingPlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HostingPlans {
    Table,
    Id,
    Name,
    Description,
    MonthlyPriceCents,
    YearlyPriceCents,
    Features,
    StripeProductId,
    StripePriceIdMonthly,
    StripePriceIdYearly,
    CreatedAt,
    UpdatedAt,
}
