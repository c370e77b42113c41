//! Named roles (`User`, `Admin`, ...) and their assignment to users.
use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::{errors, user_role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(errors::ModelError::Validation("role name required".into())); }
    if name.len() > 64 { return Err(errors::ModelError::Validation("role name too long (<=64)".into())); }
    Ok(())
}

pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Return the role called `name`, creating it first if it does not exist yet.
pub async fn find_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    if let Some(existing) = find_by_name(db, name).await? {
        return Ok(existing);
    }
    let am = ActiveModel { name: Set(name.trim().to_string()), ..Default::default() };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Role names held by a user, sorted.
pub async fn names_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Vec<String>, errors::ModelError> {
    let role_ids: Vec<i32> = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .into_iter()
        .map(|ur| ur.role_id)
        .collect();
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = Entity::find()
        .filter(Column::Id.is_in(role_ids))
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .into_iter()
        .map(|r| r.name)
        .collect();
    names.sort();
    Ok(names)
}
