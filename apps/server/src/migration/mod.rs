//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_lead_groups;
mod m20261001_000002_create_leads;
mod m20261001_000003_create_recordings;
mod m20261001_000004_create_analyses;
mod m20261001_000005_create_company_brain;
mod m20261001_000006_create_brain_documents;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_lead_groups::Migration),
            Box::new(m20261001_000002_create_leads::Migration),
            Box::new(m20261001_000003_create_recordings::Migration),
            Box::new(m20261001_000004_create_analyses::Migration),
            Box::new(m20261001_000005_create_company_brain::Migration),
            Box::new(m20261001_000006_create_brain_documents::Migration),
        ]
    }
}
