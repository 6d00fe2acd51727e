pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_reference;
mod m20250301_000002_create_agencies_users;
mod m20250301_000003_create_trips_fares;
mod m20250301_000004_create_rules;
mod m20250301_000005_create_passengers;
mod m20250301_000006_create_reservations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference::Migration),
            Box::new(m20250301_000002_create_agencies_users::Migration),
            Box::new(m20250301_000003_create_trips_fares::Migration),
            Box::new(m20250301_000004_create_rules::Migration),
            Box::new(m20250301_000005_create_passengers::Migration),
            Box::new(m20250301_000006_create_reservations::Migration),
        ]
    }
}
