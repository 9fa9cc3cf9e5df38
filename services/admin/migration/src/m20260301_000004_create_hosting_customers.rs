use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HostingCustomers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HostingCustomers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HostingCustomers::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HostingCustomers::CustomerEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HostingCustomers::Domain).string().not_null())
                    .col(ColumnDef::new(HostingCustomers::Plan).string().not_null())
                    .col(
                        ColumnDef::new(HostingCustomers::BillingCycle)
                            .string()
                            .not_null()
                            .default("yearly"),
                    )
                    .col(
                        ColumnDef::new(HostingCustomers::AmountCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(HostingCustomers::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(HostingCustomers::StartDate).date())
                    .col(ColumnDef::new(HostingCustomers::RenewalDate).date())
                    .col(ColumnDef::new(HostingCustomers::ExternalCustomerRef).string())
                    .col(ColumnDef::new(HostingCustomers::ExternalSubscriptionRef).string())
                    .col(ColumnDef::new(HostingCustomers::Notes).text())
                    .col(
                        ColumnDef::new(HostingCustomers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HostingCustomers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(HostingCustomers::Table)
                    .col(HostingCustomers::ExternalCustomerRef)
                    .name("idx_hosting_customers_external_customer_ref")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(HostingCustomers::Table)
                    .col(HostingCustomers::RenewalDate)
                    .name("idx_hosting_customers_renewal_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HostingCustomers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HostingCustomers {
    Table,
    Id,
    CustomerName,
    CustomerEmail,
    Domain,
    Plan,
    BillingCycle,
    AmountCents,
    Status,
    StartDate,
    RenewalDate,
    ExternalCustomerRef,
    ExternalSubscriptionRef,
    Notes,
    CreatedAt,
    UpdatedAt,
}
