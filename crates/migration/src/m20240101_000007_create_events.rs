//! Create `events` and its children: milestones, images and the
//! event-to-service link table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn event_fk(name: &str, table: impl IntoIden + 'static, col: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Events::Table, Events::Id)
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
                    .table(Events::Table)
                    .if_not_exists()
                    .col(uuid(Events::Id).primary_key())
                    .col(uuid(Events::CreatorId))
                    .col(string_len(Events::Name, 255))
                    .col(text_null(Events::Description))
                    .col(timestamp_with_time_zone(Events::StartTime))
                    .col(timestamp_with_time_zone(Events::EndTime))
                    .col(timestamp_with_time_zone(Events::FundingDeadline))
                    .col(string_len(Events::Timezone, 64))
                    .col(string_len_null(Events::Location, 255))
                    .col(string_len(Events::Visibility, 16).default("public"))
                    .col(double(Events::TargetAmount))
                    .col(double(Events::AmountRaised).default(0.0))
                    .col(string_len(Events::RewardType, 32))
                    .col(integer_null(Events::Capacity))
                    .col(double_null(Events::TicketPrice))
                    .col(string_len(Events::Status, 16).default("pending"))
                    .col(timestamp_with_time_zone(Events::CreatedAt))
                    .col(timestamp_with_time_zone(Events::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_creator")
                            .from(Events::Table, Events::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventMilestones::Table)
                    .if_not_exists()
                    .col(uuid(EventMilestones::Id).primary_key())
                    .col(uuid(EventMilestones::EventId))
                    .col(string_len(EventMilestones::Title, 255))
                    .col(text_null(EventMilestones::Description))
                    .col(double(EventMilestones::FundingGoal))
                    .col(string_len(EventMilestones::Status, 16).default("pending"))
                    .foreign_key(&mut event_fk(
                        "fk_event_milestone_event",
                        EventMilestones::Table,
                        EventMilestones::EventId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventImages::Table)
                    .if_not_exists()
                    .col(uuid(EventImages::Id).primary_key())
                    .col(uuid(EventImages::EventId))
                    .col(string_len(EventImages::ImageUrl, 512))
                    .col(boolean(EventImages::IsCover).default(false))
                    .foreign_key(&mut event_fk("fk_event_image_event", EventImages::Table, EventImages::EventId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventServices::Table)
                    .if_not_exists()
                    .col(uuid(EventServices::Id).primary_key())
                    .col(uuid(EventServices::EventId))
                    .col(string_len(EventServices::ServiceId, 64))
                    .foreign_key(&mut event_fk(
                        "fk_event_service_event",
                        EventServices::Table,
                        EventServices::EventId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_service_service")
                            .from(EventServices::Table, EventServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(EventServices::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(EventImages::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(EventMilestones::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Events::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    CreatorId,
    Name,
    Description,
    StartTime,
    EndTime,
    FundingDeadline,
    Timezone,
    Location,
    Visibility,
    TargetAmount,
    AmountRaised,
    RewardType,
    Capacity,
    TicketPrice,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EventMilestones { Table, Id, EventId, Title, Description, FundingGoal, Status }

#[derive(DeriveIden)]
enum EventImages { Table, Id, EventId, ImageUrl, IsCover }

#[derive(DeriveIden)]
enum EventServices { Table, Id, EventId, ServiceId }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }
