//! Create `contributions` table.
//!
//! Each row targets either a campaign or an event; the service layer
//! enforces exactly one.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(uuid(Contributions::Id).primary_key())
                    .col(uuid(Contributions::UserId))
                    .col(uuid_null(Contributions::CampaignId))
                    .col(uuid_null(Contributions::EventId))
                    .col(double(Contributions::Amount))
                    .col(string_len(Contributions::TransactionHash, 255).unique_key())
                    .col(string_len(Contributions::Currency, 16))
                    .col(string_len_null(Contributions::Tier, 128))
                    .col(timestamp_with_time_zone(Contributions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contribution_user")
                            .from(Contributions::Table, Contributions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contribution_campaign")
                            .from(Contributions::Table, Contributions::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contribution_event")
                            .from(Contributions::Table, Contributions::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Contributions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Contributions { Table, Id, UserId, CampaignId, EventId, Amount, TransactionHash, Currency, Tier, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Campaigns { Table, Id }

#[derive(DeriveIden)]
enum Events { Table, Id }
