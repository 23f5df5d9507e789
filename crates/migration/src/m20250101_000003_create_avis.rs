//! Create `avis` table with FK to `clients`.
//!
//! Reviews disappear with their client; rating is constrained to 1..=5.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Avis::Table)
                    .if_not_exists()
                    .col(uuid(Avis::Id).primary_key())
                    .col(uuid(Avis::ClientId).not_null())
                    .col(
                        ColumnDef::new(Avis::Rating)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Avis::Rating).between(1, 5)),
                    )
                    .col(ColumnDef::new(Avis::Comment).text().null())
                    .col(ColumnDef::new(Avis::Contact).string_len(255).null())
                    .col(timestamp_with_time_zone(Avis::SubmittedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_avis_client")
                            .from(Avis::Table, Avis::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Avis::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Avis { Table, Id, ClientId, Rating, Comment, Contact, SubmittedAt }

#[derive(DeriveIden)]
enum Clients { Table, Id }
