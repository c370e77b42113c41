//! Expense groups. `created_by` stores the creator's email as given, without a foreign key.
use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_group")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "groupId")]
    pub id: i32,
    pub group_name: String,
    pub group_description: String,
    pub created_by: String,
    pub created_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_group_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("group name required".into())); }
    if name.len() > 128 { return Err(errors::ModelError::Validation("group name too long (<=128)".into())); }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.len() > 4096 {
        return Err(errors::ModelError::Validation("group description too long (<=4096)".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    group_name: &str,
    group_description: &str,
    created_by: &str,
    created_date: DateTimeWithTimeZone,
) -> Result<Model, errors::ModelError> {
    validate_group_name(group_name)?;
    validate_description(group_description)?;
    let am = ActiveModel {
        group_name: Set(group_name.trim().to_string()),
        group_description: Set(group_description.to_string()),
        created_by: Set(created_by.trim().to_string()),
        created_date: Set(created_date),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
