use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Campaigns: creator listing and newest-first pages
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_creator")
                    .table(Campaigns::Table)
                    .col(Campaigns::CreatorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_status_created")
                    .table(Campaigns::Table)
                    .col(Campaigns::Status)
                    .col(Campaigns::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Campaign children are always loaded by campaign_id
        for (name, table) in [
            ("idx_campaign_image_campaign", CampaignChild::CampaignImages),
            ("idx_story_section_campaign", CampaignChild::CampaignStorySections),
            ("idx_roadmap_phase_campaign", CampaignChild::CampaignRoadmapPhases),
            ("idx_team_member_campaign", CampaignChild::CampaignTeamMembers),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(table)
                        .col(CampaignChild::CampaignId)
                        .to_owned(),
                )
                .await?;
        }

        // Tiers: one name per campaign
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_tier_campaign_name")
                    .table(Tiers::Table)
                    .col(Tiers::CampaignId)
                    .col(Tiers::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Milestones: the voting query filters on status
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_milestone_campaign_status")
                    .table(Milestones::Table)
                    .col(Milestones::CampaignId)
                    .col(Milestones::Status)
                    .to_owned(),
            )
            .await?;

        // Contributions: by wallet, campaign and event
        for (name, col) in [
            ("idx_contribution_user", Contributions::UserId),
            ("idx_contribution_campaign", Contributions::CampaignId),
            ("idx_contribution_event", Contributions::EventId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Contributions::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        // Events: children by event_id
        for (name, table) in [
            ("idx_event_milestone_event", EventChild::EventMilestones),
            ("idx_event_image_event", EventChild::EventImages),
            ("idx_event_service_event", EventChild::EventServices),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(table)
                        .col(EventChild::EventId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Postgres and SQLite resolve index names without the table
        for name in [
            "idx_campaign_creator",
            "idx_campaign_status_created",
            "idx_campaign_image_campaign",
            "idx_story_section_campaign",
            "idx_roadmap_phase_campaign",
            "idx_team_member_campaign",
            "uniq_tier_campaign_name",
            "idx_milestone_campaign_status",
            "idx_contribution_user",
            "idx_contribution_campaign",
            "idx_contribution_event",
            "idx_event_milestone_event",
            "idx_event_image_event",
            "idx_event_service_event",
        ] {
            manager
                .drop_index(Index::drop().name(name).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Campaigns { Table, CreatorId, Status, CreatedAt }

#[derive(DeriveIden)]
enum CampaignChild {
    CampaignImages,
    CampaignStorySections,
    CampaignRoadmapPhases,
    CampaignTeamMembers,
    CampaignId,
}

#[derive(DeriveIden)]
enum Tiers { Table, CampaignId, Name }

#[derive(DeriveIden)]
enum Milestones { Table, CampaignId, Status }

#[derive(DeriveIden)]
enum Contributions { Table, UserId, CampaignId, EventId }

#[derive(DeriveIden)]
enum EventChild { EventMilestones, EventImages, EventServices, EventId }
