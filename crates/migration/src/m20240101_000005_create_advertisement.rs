//! Create `advertisement` table with FKs to `user` (author) and `category`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Advertisement::Table)
                    .if_not_exists()
                    .col(pk_auto(Advertisement::Id))
                    .col(string_len(Advertisement::Name, 255).not_null())
                    .col(ColumnDef::new(Advertisement::AuthorId).integer().not_null())
                    .col(ColumnDef::new(Advertisement::Price).integer().not_null())
                    .col(ColumnDef::new(Advertisement::Description).text().null())
                    .col(ColumnDef::new(Advertisement::Image).string_len(255).null())
                    .col(
                        ColumnDef::new(Advertisement::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Advertisement::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advertisement_author")
                            .from(Advertisement::Table, Advertisement::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advertisement_category")
                            .from(Advertisement::Table, Advertisement::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Advertisement::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Advertisement { Table, Id, Name, AuthorId, Price, Description, Image, IsPublished, CategoryId }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Category { Table, Id }
