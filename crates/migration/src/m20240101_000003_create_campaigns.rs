//! Create `campaigns` table with FK to `users`.
//!
//! `current_amount` only moves through contributions.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(uuid(Campaigns::Id).primary_key())
                    .col(uuid(Campaigns::CreatorId))
                    .col(string_len_null(Campaigns::OnChainObjectId, 128).unique_key())
                    .col(string_len(Campaigns::Title, 255))
                    .col(text_null(Campaigns::ShortDescription))
                    .col(string_len(Campaigns::Category, 64))
                    .col(double(Campaigns::GoalAmount))
                    .col(double(Campaigns::CurrentAmount).default(0.0))
                    .col(string_len(Campaigns::Currency, 16).default("USD"))
                    .col(integer(Campaigns::DurationDays))
                    .col(timestamp_with_time_zone(Campaigns::EndDate))
                    .col(string_len(Campaigns::RewardType, 16).default("none"))
                    .col(string_len(Campaigns::Status, 16).default("active"))
                    .col(timestamp_with_time_zone(Campaigns::CreatedAt))
                    .col(timestamp_with_time_zone(Campaigns::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_creator")
                            .from(Campaigns::Table, Campaigns::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Campaigns::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Campaigns {
    Table,
    Id,
    CreatorId,
    OnChainObjectId,
    Title,
    ShortDescription,
    Category,
    GoalAmount,
    CurrentAmount,
    Currency,
    DurationDays,
    EndDate,
    RewardType,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
