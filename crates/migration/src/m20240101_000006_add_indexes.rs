use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Advertisement: published count per author
        manager
            .create_index(
                Index::create()
                    .name("idx_advertisement_author_published")
                    .table(Advertisement::Table)
                    .col(Advertisement::AuthorId)
                    .col(Advertisement::IsPublished)
                    .to_owned(),
            )
            .await?;

        // Advertisement: list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_advertisement_price")
                    .table(Advertisement::Table)
                    .col(Advertisement::Price)
                    .to_owned(),
            )
            .await?;

        // UserLocation: reverse lookup by location
        manager
            .create_index(
                Index::create()
                    .name("idx_user_location_location")
                    .table(UserLocation::Table)
                    .col(UserLocation::LocationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_advertisement_author_published").table(Advertisement::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_advertisement_price").table(Advertisement::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_location_location").table(UserLocation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Advertisement { Table, AuthorId, IsPublished, Price }

#[derive(DeriveIden)]
enum UserLocation { Table, LocationId }
