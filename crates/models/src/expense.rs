//! An amount paid by one person on behalf of a group. `amount` is the balance
//! still outstanding and shrinks as members settle their shares.
use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors, group};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "expenseId")]
    pub id: i32,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
    pub paid_by_email: String,
    pub date: DateTimeWithTimeZone,
    pub group_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Group }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Group => Entity::belongs_to(group::Entity).from(Column::GroupId).to(group::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.trim().is_empty() { return Err(errors::ModelError::Validation("description required".into())); }
    if description.len() > 512 { return Err(errors::ModelError::Validation("description too long (<=512)".into())); }
    Ok(())
}

/// Non-negative, at most two decimal places.
pub fn validate_amount(amount: Decimal) -> Result<(), errors::ModelError> {
    if amount < Decimal::ZERO {
        return Err(errors::ModelError::Validation("amount must be a non-negative number".into()));
    }
    if amount.normalize().scale() > 2 {
        return Err(errors::ModelError::Validation("amount allows at most 2 decimal places".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    description: &str,
    amount: Decimal,
    paid_by_email: &str,
    date: DateTimeWithTimeZone,
    group_id: i32,
) -> Result<Model, errors::ModelError> {
    validate_description(description)?;
    validate_amount(amount)?;
    let am = ActiveModel {
        description: Set(description.trim().to_string()),
        amount: Set(amount),
        paid_by_email: Set(paid_by_email.trim().to_string()),
        date: Set(date),
        group_id: Set(group_id),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_non_negative_cents() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::new(1250, 2)).is_ok());
        assert!(validate_amount(Decimal::new(1500, 3)).is_ok());
        assert!(validate_amount(Decimal::NEGATIVE_ONE).is_err());
        assert!(validate_amount(Decimal::new(1, 3)).is_err());
    }
}
