//! Create `expense`. `amount` is the remaining balance and is decremented by settlements.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expense::Table)
                    .if_not_exists()
                    .col(pk_auto(Expense::Id))
                    .col(string_len(Expense::Description, 512).not_null())
                    .col(decimal_len(Expense::Amount, 18, 2).not_null())
                    .col(string_len(Expense::PaidByEmail, 255).not_null())
                    .col(timestamp_with_time_zone(Expense::Date).not_null())
                    .col(integer(Expense::GroupId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_group")
                            .from(Expense::Table, Expense::GroupId)
                            .to(ExpenseGroup::Table, ExpenseGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Expense::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Expense { Table, Id, Description, Amount, PaidByEmail, Date, GroupId }

#[derive(DeriveIden)]
enum ExpenseGroup { Table, Id }
