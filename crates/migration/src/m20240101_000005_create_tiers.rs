//! Create `tiers` table. `current` counts contributions that claimed the tier.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tiers::Table)
                    .if_not_exists()
                    .col(uuid(Tiers::Id).primary_key())
                    .col(uuid(Tiers::CampaignId))
                    .col(string_len(Tiers::Name, 128))
                    .col(text_null(Tiers::Description))
                    .col(integer(Tiers::SupplyLimit))
                    .col(integer(Tiers::Current).default(0))
                    .col(boolean(Tiers::IsActive).default(false))
                    .col(timestamp_with_time_zone(Tiers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tier_campaign")
                            .from(Tiers::Table, Tiers::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tiers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tiers { Table, Id, CampaignId, Name, Description, SupplyLimit, Current, IsActive, CreatedAt }

#[derive(DeriveIden)]
enum Campaigns { Table, Id }
