//! Create `user_location` association table (user <-> location, many-to-many).
//!
//! Deleting either side removes the association rows, never the other side.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserLocation::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserLocation::UserId).integer().not_null())
                    .col(ColumnDef::new(UserLocation::LocationId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserLocation::UserId)
                            .col(UserLocation::LocationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_location_user")
                            .from(UserLocation::Table, UserLocation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_location_location")
                            .from(UserLocation::Table, UserLocation::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserLocation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserLocation { Table, UserId, LocationId }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Location { Table, Id }
