use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reviews are always read per client, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_avis_client_submitted")
                    .table(Avis::Table)
                    .col(Avis::ClientId)
                    .col(Avis::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        // Dashboard "last 7 days" scan
        manager
            .create_index(
                Index::create()
                    .name("idx_avis_submitted")
                    .table(Avis::Table)
                    .col(Avis::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clients_created")
                    .table(Clients::Table)
                    .col(Clients::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_clients_created").table(Clients::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_avis_submitted").table(Avis::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_avis_client_submitted").table(Avis::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Avis { Table, ClientId, SubmittedAt }

#[derive(DeriveIden)]
enum Clients { Table, CreatedAt }
