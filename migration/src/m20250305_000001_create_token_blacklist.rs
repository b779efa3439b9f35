use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 令牌黑名单表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TokenBlacklist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TokenBlacklist::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TokenBlacklist::Jti)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TokenBlacklist::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenBlacklist::TokenType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenBlacklist::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenBlacklist::BlacklistedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TokenBlacklist::Table, TokenBlacklist::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 过期清理使用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_token_blacklist_expires_at")
                    .table(TokenBlacklist::Table)
                    .col(TokenBlacklist::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TokenBlacklist::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum TokenBlacklist {
    #[sea_orm(iden = "token_blacklist")]
    Table,
    Id,
    Jti,
    UserId,
    TokenType,
    ExpiresAt,
    BlacklistedAt,
}
