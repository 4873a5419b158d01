//! Create post image and post video tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostImage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostImage::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostImage::Url).string_len(1024).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_image_post")
                            .from(PostImage::Table, PostImage::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: post_id (for listing a post's images)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_image_post_id")
                    .table(PostImage::Table)
                    .col(PostImage::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostVideo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostVideo::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostVideo::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostVideo::Url).string_len(1024).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_video_post")
                            .from(PostVideo::Table, PostVideo::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: post_id (for listing a post's videos)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_video_post_id")
                    .table(PostVideo::Table)
                    .col(PostVideo::PostId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostVideo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostImage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostImage {
    Table,
    Id,
    PostId,
    Url,
}

#[derive(Iden)]
enum PostVideo {
    Table,
    Id,
    PostId,
    Url,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}
