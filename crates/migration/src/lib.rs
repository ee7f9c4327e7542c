pub use sea_orm_migration::prelude::*;

mod m20260105_000001_account_codes;
mod m20260105_000002_documents;
mod m20260105_000003_entries;
mod m20260112_000001_payment_schedules;
mod m20260119_000001_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_account_codes::Migration),
            Box::new(m20260105_000002_documents::Migration),
            Box::new(m20260105_000003_entries::Migration),
            Box::new(m20260112_000001_payment_schedules::Migration),
            Box::new(m20260119_000001_activity_logs::Migration),
        ]
    }
}
