use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors, expense};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member_payment")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "memberPaymentId")]
    pub id: i32,
    pub expense_id: i32,
    pub member_email: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub paid_amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Expense }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Expense => Entity::belongs_to(expense::Entity).from(Column::ExpenseId).to(expense::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    expense_id: i32,
    member_email: &str,
    paid_amount: Decimal,
) -> Result<Model, errors::ModelError> {
    expense::validate_amount(paid_amount)?;
    let am = ActiveModel {
        expense_id: Set(expense_id),
        member_email: Set(member_email.trim().to_string()),
        paid_amount: Set(paid_amount),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
