//! Create `clients` table.
//!
//! One row per reviewed business; `name` and `slug` are both unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(uuid(Clients::Id).primary_key())
                    .col(string_len(Clients::Name, 255).unique_key().not_null())
                    .col(string_len(Clients::Slug, 255).unique_key().not_null())
                    .col(string_len(Clients::Language, 16).not_null())
                    .col(ColumnDef::new(Clients::BusinessStatus).string_len(64).null())
                    .col(ColumnDef::new(Clients::PlaceId).string_len(255).null())
                    .col(string_len(Clients::PublicUrl, 512).not_null())
                    .col(string_len(Clients::Status, 32).not_null())
                    .col(ColumnDef::new(Clients::ContactName).string_len(255).null())
                    .col(ColumnDef::new(Clients::ContactEmail).string_len(255).null())
                    .col(ColumnDef::new(Clients::ContactPhone).string_len(64).null())
                    .col(ColumnDef::new(Clients::AdminNotes).text().null())
                    .col(ColumnDef::new(Clients::Logo).string_len(255).null())
                    .col(timestamp_with_time_zone(Clients::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Clients::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Clients::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    Slug,
    Language,
    BusinessStatus,
    PlaceId,
    PublicUrl,
    Status,
    ContactName,
    ContactEmail,
    ContactPhone,
    AdminNotes,
    Logo,
    CreatedAt,
    UpdatedAt,
}
