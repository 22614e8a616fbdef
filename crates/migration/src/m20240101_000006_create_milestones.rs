//! Create `milestones` table.
//!
//! Status walks `pending -> in-voting -> approved -> claimed`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Milestones::Table)
                    .if_not_exists()
                    .col(uuid(Milestones::Id).primary_key())
                    .col(uuid(Milestones::CampaignId))
                    .col(string_len_null(Milestones::OnChainMilestoneId, 128))
                    .col(string_len(Milestones::Title, 255))
                    .col(text_null(Milestones::Description))
                    .col(json(Milestones::Deliverables))
                    .col(double(Milestones::FundingGoal))
                    .col(string_len(Milestones::Currency, 16).default("USD"))
                    .col(string_len(Milestones::Status, 16).default("pending"))
                    .col(big_integer(Milestones::VoteResult).default(0))
                    .col(boolean(Milestones::IsClaimed).default(false))
                    .col(timestamp_with_time_zone_null(Milestones::TimelineStart))
                    .col(timestamp_with_time_zone_null(Milestones::TimelineEnd))
                    .col(timestamp_with_time_zone(Milestones::VotingDeadline))
                    .col(timestamp_with_time_zone(Milestones::CreatedAt))
                    .col(timestamp_with_time_zone(Milestones::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_milestone_campaign")
                            .from(Milestones::Table, Milestones::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Milestones::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Milestones {
    Table,
    Id,
    CampaignId,
    OnChainMilestoneId,
    Title,
    Description,
    Deliverables,
    FundingGoal,
    Currency,
    Status,
    VoteResult,
    IsClaimed,
    TimelineStart,
    TimelineEnd,
    VotingDeadline,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Campaigns { Table, Id }
