use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use models::{errors::ModelError, expense, group, group_membership, member_payment, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use crate::errors::{db_err, ServiceError};

/// Fields accepted when creating a group. `created_date` defaults to now.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub group_name: String,
    pub group_description: String,
    pub created_by: String,
    pub created_date: Option<DateTimeWithTimeZone>,
}

#[instrument(skip(db, input), fields(group_name = %input.group_name, created_by = %input.created_by))]
pub async fn create_group(db: &DatabaseConnection, input: NewGroup) -> Result<group::Model, ServiceError> {
    let created_date = input.created_date.unwrap_or_else(|| Utc::now().into());
    let created = group::create(db, &input.group_name, &input.group_description, &input.created_by, created_date).await?;
    info!(group_id = created.id, "group_created");
    Ok(created)
}

pub async fn list_groups(db: &DatabaseConnection) -> Result<Vec<group::Model>, ServiceError> {
    group::Entity::find()
        .order_by_asc(group::Column::Id)
        .all(db)
        .await
        .map_err(db_err("list_groups"))
}

pub async fn get_group(db: &DatabaseConnection, id: i32) -> Result<Option<group::Model>, ServiceError> {
    group::Entity::find_by_id(id).one(db).await.map_err(db_err("get_group"))
}

/// Change name and description. Returns `false` when the group does not exist.
#[instrument(skip(db))]
pub async fn update_group(
    db: &DatabaseConnection,
    id: i32,
    group_name: &str,
    group_description: &str,
) -> Result<bool, ServiceError> {
    group::validate_group_name(group_name)?;
    group::validate_description(group_description)?;
    let Some(existing) = get_group(db, id).await? else {
        return Ok(false);
    };
    let mut am: group::ActiveModel = existing.into();
    am.group_name = Set(group_name.trim().to_string());
    am.group_description = Set(group_description.to_string());
    am.update(db).await.map_err(db_err("update_group"))?;
    Ok(true)
}

/// Remove a group with its expenses, their payments and its memberships.
/// Returns `false` when the group does not exist.
#[instrument(skip(db))]
pub async fn delete_group(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let txn = db.begin().await.map_err(db_err("delete_group"))?;
    if group::Entity::find_by_id(id).one(&txn).await.map_err(db_err("delete_group"))?.is_none() {
        return Ok(false);
    }

    let expense_ids: Vec<i32> = expense::Entity::find()
        .filter(expense::Column::GroupId.eq(id))
        .all(&txn)
        .await
        .map_err(db_err("delete_group"))?
        .into_iter()
        .map(|e| e.id)
        .collect();
    if !expense_ids.is_empty() {
        member_payment::Entity::delete_many()
            .filter(member_payment::Column::ExpenseId.is_in(expense_ids.clone()))
            .exec(&txn)
            .await
            .map_err(db_err("delete_group"))?;
    }
    expense::Entity::delete_many()
        .filter(expense::Column::GroupId.eq(id))
        .exec(&txn)
        .await
        .map_err(db_err("delete_group"))?;
    group_membership::Entity::delete_many()
        .filter(group_membership::Column::GroupId.eq(id))
        .exec(&txn)
        .await
        .map_err(db_err("delete_group"))?;
    group::Entity::delete_by_id(id).exec(&txn).await.map_err(db_err("delete_group"))?;

    txn.commit().await.map_err(db_err("delete_group"))?;
    info!(group_id = id, expenses = expense_ids.len(), "group_deleted");
    Ok(true)
}

/// Add the user with `email` to a group.
#[instrument(skip(db))]
pub async fn add_member(
    db: &DatabaseConnection,
    group_id: i32,
    email: &str,
) -> Result<group_membership::Model, ServiceError> {
    let user = user::find_by_email(db, email).await?.ok_or(ServiceError::UserNotFound)?;
    get_group(db, group_id).await?.ok_or(ServiceError::GroupNotFound)?;
    if group_membership::exists(db, group_id, user.id).await? {
        return Err(ServiceError::AlreadyMember);
    }
    // the unique index still rejects a concurrent insert that passed the check above
    let created = group_membership::create(db, group_id, user.id).await.map_err(|e| match e {
        ModelError::Duplicate(_) => ServiceError::AlreadyMember,
        other => ServiceError::Model(other),
    })?;
    info!(group_id, user_id = %user.id, "member_added");
    Ok(created)
}

/// Users holding a membership in the group.
pub async fn members(db: &DatabaseConnection, group_id: i32) -> Result<Vec<user::Model>, ServiceError> {
    let user_ids: Vec<uuid::Uuid> = group_membership::Entity::find()
        .filter(group_membership::Column::GroupId.eq(group_id))
        .all(db)
        .await
        .map_err(db_err("members"))?
        .into_iter()
        .map(|m| m.user_id)
        .collect();
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .order_by_asc(user::Column::Email)
        .all(db)
        .await
        .map_err(db_err("members"))
}

/// Groups the user belongs to or created, each listed once.
pub async fn groups_for_user(db: &DatabaseConnection, email: &str) -> Result<Vec<group::Model>, ServiceError> {
    let member_of: Vec<i32> = match user::find_by_email(db, email).await? {
        Some(u) => group_membership::Entity::find()
            .filter(group_membership::Column::UserId.eq(u.id))
            .all(db)
            .await
            .map_err(db_err("groups_for_user"))?
            .into_iter()
            .map(|m| m.group_id)
            .collect(),
        None => Vec::new(),
    };
    let mut cond = Condition::any().add(group::Column::CreatedBy.eq(email.trim()));
    if !member_of.is_empty() {
        cond = cond.add(group::Column::Id.is_in(member_of));
    }
    group::Entity::find()
        .filter(cond)
        .order_by_asc(group::Column::Id)
        .all(db)
        .await
        .map_err(db_err("groups_for_user"))
}
