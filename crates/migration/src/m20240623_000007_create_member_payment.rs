//! Create `member_payment`, the append-only log of partial settlements.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemberPayment::Table)
                    .if_not_exists()
                    .col(pk_auto(MemberPayment::Id))
                    .col(integer(MemberPayment::ExpenseId).not_null())
                    .col(string_len(MemberPayment::MemberEmail, 255).not_null())
                    .col(decimal_len(MemberPayment::PaidAmount, 18, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_payment_expense")
                            .from(MemberPayment::Table, MemberPayment::ExpenseId)
                            .to(Expense::Table, Expense::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MemberPayment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MemberPayment { Table, Id, ExpenseId, MemberEmail, PaidAmount }

#[derive(DeriveIden)]
enum Expense { Table, Id }
