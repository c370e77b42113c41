use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // GroupMembership: one row per (group, user)
        manager
            .create_index(
                Index::create()
                    .name("uniq_group_membership_group_user")
                    .table(GroupMembership::Table)
                    .col(GroupMembership::GroupId)
                    .col(GroupMembership::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // UserRole: one row per (user, role)
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_role_user_role")
                    .table(UserRole::Table)
                    .col(UserRole::UserId)
                    .col(UserRole::RoleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Expense: lookups by group and by payer
        manager
            .create_index(
                Index::create()
                    .name("idx_expense_group")
                    .table(Expense::Table)
                    .col(Expense::GroupId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_expense_paid_by")
                    .table(Expense::Table)
                    .col(Expense::PaidByEmail)
                    .to_owned(),
            )
            .await?;

        // MemberPayment: lookups by expense
        manager
            .create_index(
                Index::create()
                    .name("idx_member_payment_expense")
                    .table(MemberPayment::Table)
                    .col(MemberPayment::ExpenseId)
                    .to_owned(),
            )
            .await?;

        // ExpenseGroup: groups created by a user
        manager
            .create_index(
                Index::create()
                    .name("idx_expense_group_created_by")
                    .table(ExpenseGroup::Table)
                    .col(ExpenseGroup::CreatedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_group_membership_group_user").table(GroupMembership::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_user_role_user_role").table(UserRole::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_group").table(Expense::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_paid_by").table(Expense::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_member_payment_expense").table(MemberPayment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_group_created_by").table(ExpenseGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GroupMembership { Table, GroupId, UserId }

#[derive(DeriveIden)]
enum UserRole { Table, UserId, RoleId }

#[derive(DeriveIden)]
enum Expense { Table, GroupId, PaidByEmail }

#[derive(DeriveIden)]
enum MemberPayment { Table, ExpenseId }

#[derive(DeriveIden)]
enum ExpenseGroup { Table, CreatedBy }
