//! Create `group_membership` joining users to groups.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupMembership::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupMembership::Id))
                    .col(integer(GroupMembership::GroupId).not_null())
                    .col(uuid(GroupMembership::UserId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_membership_group")
                            .from(GroupMembership::Table, GroupMembership::GroupId)
                            .to(ExpenseGroup::Table, ExpenseGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_membership_user")
                            .from(GroupMembership::Table, GroupMembership::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GroupMembership::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum GroupMembership { Table, Id, GroupId, UserId }

#[derive(DeriveIden)]
enum ExpenseGroup { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
