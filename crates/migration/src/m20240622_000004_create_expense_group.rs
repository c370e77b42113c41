//! Create `expense_group`. `created_by` holds the creator's email, not a FK.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExpenseGroup::Table)
                    .if_not_exists()
                    .col(pk_auto(ExpenseGroup::Id))
                    .col(string_len(ExpenseGroup::GroupName, 128).not_null())
                    .col(text(ExpenseGroup::GroupDescription).not_null())
                    .col(string_len(ExpenseGroup::CreatedBy, 255).not_null())
                    .col(timestamp_with_time_zone(ExpenseGroup::CreatedDate).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ExpenseGroup::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ExpenseGroup { Table, Id, GroupName, GroupDescription, CreatedBy, CreatedDate }
