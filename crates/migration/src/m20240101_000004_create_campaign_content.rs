//! Create the campaign child tables: images, story sections, roadmap phases
//! and team members. All cascade with their campaign.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn campaign_fk(name: &str, table: impl IntoIden + 'static, col: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Campaigns::Table, Campaigns::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignImages::Table)
                    .if_not_exists()
                    .col(uuid(CampaignImages::Id).primary_key())
                    .col(uuid(CampaignImages::CampaignId))
                    .col(string_len(CampaignImages::ImageRef, 512))
                    .col(string_len(CampaignImages::Kind, 32).default("gallery"))
                    .col(boolean(CampaignImages::IsCover).default(false))
                    .col(timestamp_with_time_zone(CampaignImages::CreatedAt))
                    .foreign_key(&mut campaign_fk(
                        "fk_campaign_image_campaign",
                        CampaignImages::Table,
                        CampaignImages::CampaignId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignStorySections::Table)
                    .if_not_exists()
                    .col(uuid(CampaignStorySections::Id).primary_key())
                    .col(uuid(CampaignStorySections::CampaignId))
                    .col(string_len(CampaignStorySections::Title, 255))
                    .col(text(CampaignStorySections::Content))
                    .col(integer(CampaignStorySections::DisplayOrder).default(0))
                    .foreign_key(&mut campaign_fk(
                        "fk_story_section_campaign",
                        CampaignStorySections::Table,
                        CampaignStorySections::CampaignId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignRoadmapPhases::Table)
                    .if_not_exists()
                    .col(uuid(CampaignRoadmapPhases::Id).primary_key())
                    .col(uuid(CampaignRoadmapPhases::CampaignId))
                    .col(string_len(CampaignRoadmapPhases::Title, 255))
                    .col(string_len(CampaignRoadmapPhases::Timeline, 128))
                    .col(text(CampaignRoadmapPhases::Description))
                    .col(string_len(CampaignRoadmapPhases::State, 16).default("future"))
                    .col(integer(CampaignRoadmapPhases::DisplayOrder).default(0))
                    .foreign_key(&mut campaign_fk(
                        "fk_roadmap_phase_campaign",
                        CampaignRoadmapPhases::Table,
                        CampaignRoadmapPhases::CampaignId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignTeamMembers::Table)
                    .if_not_exists()
                    .col(uuid(CampaignTeamMembers::Id).primary_key())
                    .col(uuid(CampaignTeamMembers::CampaignId))
                    .col(string_len(CampaignTeamMembers::Name, 255))
                    .col(string_len(CampaignTeamMembers::Role, 128))
                    .col(json(CampaignTeamMembers::ContactInfo))
                    .foreign_key(&mut campaign_fk(
                        "fk_team_member_campaign",
                        CampaignTeamMembers::Table,
                        CampaignTeamMembers::CampaignId,
                    ))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CampaignTeamMembers::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CampaignRoadmapPhases::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CampaignStorySections::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CampaignImages::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CampaignImages { Table, Id, CampaignId, ImageRef, Kind, IsCover, CreatedAt }

#[derive(DeriveIden)]
enum CampaignStorySections { Table, Id, CampaignId, Title, Content, DisplayOrder }

#[derive(DeriveIden)]
enum CampaignRoadmapPhases { Table, Id, CampaignId, Title, Timeline, Description, State, DisplayOrder }

#[derive(DeriveIden)]
enum CampaignTeamMembers { Table, Id, CampaignId, Name, Role, ContactInfo }

#[derive(DeriveIden)]
enum Campaigns { Table, Id }
