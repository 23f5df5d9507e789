//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_admins;
mod m20250101_000002_create_clients;
mod m20250101_000003_create_avis;
mod m20250101_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_admins::Migration),
            Box::new(m20250101_000002_create_clients::Migration),
            Box::new(m20250101_000003_create_avis::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000004_add_indexes::Migration),
        ]
    }
}
