//! Create `services` catalog table. Ids are supplied by the caller.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(string_len(Services::Id, 64).primary_key())
                    .col(string_len(Services::Name, 255))
                    .col(text_null(Services::Description))
                    .col(double(Services::BaseCost))
                    .col(string_len_null(Services::Category, 64))
                    .col(boolean(Services::Popular).default(false))
                    .col(timestamp_with_time_zone(Services::CreatedAt))
                    .col(timestamp_with_time_zone(Services::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services { Table, Id, Name, Description, BaseCost, Category, Popular, CreatedAt, UpdatedAt }
