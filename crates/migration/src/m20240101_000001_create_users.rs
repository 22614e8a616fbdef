//! Create `users` table.
//!
//! One row per wallet; profiles and lazily created contributors share it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::WalletAddress, 128).unique_key())
                    .col(string_len_null(Users::Username, 128))
                    .col(string_len_null(Users::Email, 255).unique_key())
                    .col(string_len(Users::Role, 16).default("user"))
                    .col(text_null(Users::Bio))
                    .col(string_len_null(Users::AvatarUrl, 512))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, WalletAddress, Username, Email, Role, Bio, AvatarUrl, CreatedAt, UpdatedAt }
