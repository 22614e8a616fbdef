//! Migrator registering table migrations in foreign-key order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_services;
mod m20240101_000003_create_campaigns;
mod m20240101_000004_create_campaign_content;
mod m20240101_000005_create_tiers;
mod m20240101_000006_create_milestones;
mod m20240101_000007_create_events;
mod m20240101_000008_create_contributions;
mod m20240101_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_services::Migration),
            Box::new(m20240101_000003_create_campaigns::Migration),
            Box::new(m20240101_000004_create_campaign_content::Migration),
            Box::new(m20240101_000005_create_tiers::Migration),
            Box::new(m20240101_000006_create_milestones::Migration),
            Box::new(m20240101_000007_create_events::Migration),
            Box::new(m20240101_000008_create_contributions::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000009_add_indexes::Migration),
        ]
    }
}
