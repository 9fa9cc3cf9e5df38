pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_admins;
mod m20260301_000002_create_one_time_codes;
mod m20260301_000003_create_sessions;
mod m20260301_000004_create_hosting_customers;
mod m20260301_000005_create_processed_webhook_events;
mod m20260301_000006_create_hosting_plans;
mod m20260301_000007_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_admins::Migration),
            Box::new(m20260301_000002_create_one_time_codes::Migration),
            Box::new(m20260301_000003_create_sessions::Migration),
            Box::new(m20260301_000004_create_hosting_customers::Migration),
            Box::new(m20260301_000005_create_processed_webhook_events::Migration),
            Box::new(m20260301_000006_create_hosting_plans::Migration),
            Box::new(m20260301_000007_create_orders::Migration),
        ]
    }
}
