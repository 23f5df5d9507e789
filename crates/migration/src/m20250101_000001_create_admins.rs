//! Create `admins` table.
//!
//! Dashboard accounts; carries the password-reset OTP state inline.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(uuid(Admins::Id).primary_key())
                    .col(string_len(Admins::Name, 128).not_null())
                    .col(string_len(Admins::Email, 255).unique_key().not_null())
                    .col(string_len(Admins::PasswordHash, 255).not_null())
                    .col(ColumnDef::new(Admins::OtpCode).string_len(6).null())
                    .col(ColumnDef::new(Admins::OtpExpiresAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Admins::ResetAuthorizedUntil).timestamp_with_time_zone().null())
                    .col(timestamp_with_time_zone(Admins::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Admins::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Admins::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    OtpCode,
    OtpExpiresAt,
    ResetAuthorizedUntil,
    CreatedAt,
    UpdatedAt,
}
