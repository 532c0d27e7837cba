use sea_orm_migration::prelude::*;

use crate::m20260101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Followers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Followers::FollowerId).uuid().not_null())
                    .col(ColumnDef::new(Followers::FollowedId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_followers")
                            .col(Followers::FollowerId)
                            .col(Followers::FollowedId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_followers_follower_id")
                            .from(Followers::Table, Followers::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_followers_followed_id")
                            .from(Followers::Table, Followers::FollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_followers_followed_id")
                    .table(Followers::Table)
                    .col(Followers::FollowedId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Followers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Followers {
    Table,
    FollowerId,
    FollowedId,
}
