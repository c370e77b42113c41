use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument};

use models::{expense, group, group_membership, member_payment, user};
use crate::aggregation::{self, GroupFigures, UserDetail};
use crate::errors::{db_err, ServiceError};

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub paid_by_email: String,
    /// Defaults to now.
    pub date: Option<DateTimeWithTimeZone>,
    pub group_id: i32,
}

#[derive(Debug, Clone)]
pub struct ExpenseUpdate {
    pub expense_id: i32,
    pub description: String,
    pub amount: Decimal,
    pub paid_by_email: String,
    pub group_id: i32,
}

/// Record an expense. Returns `false` when the payer or the group is unknown.
#[instrument(skip(db, input), fields(group_id = input.group_id, paid_by = %input.paid_by_email))]
pub async fn add_expense(db: &DatabaseConnection, input: NewExpense) -> Result<bool, ServiceError> {
    if user::find_by_email(db, &input.paid_by_email).await?.is_none() {
        debug!("payer not found");
        return Ok(false);
    }
    if group::Entity::find_by_id(input.group_id).one(db).await.map_err(db_err("add_expense"))?.is_none() {
        debug!("group not found");
        return Ok(false);
    }
    let date = input.date.unwrap_or_else(|| Utc::now().into());
    let created = expense::create(db, &input.description, input.amount, &input.paid_by_email, date, input.group_id).await?;
    info!(expense_id = created.id, amount = %created.amount, "expense_added");
    Ok(true)
}

pub async fn expenses_by_group(db: &DatabaseConnection, group_id: i32) -> Result<Vec<expense::Model>, ServiceError> {
    expense::Entity::find()
        .filter(expense::Column::GroupId.eq(group_id))
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(db_err("expenses_by_group"))
}

/// Record a partial payment and take it off the expense's outstanding amount.
/// No upper bound is enforced, so the amount can go negative.
/// Returns `false` when the expense does not exist.
#[instrument(skip(db))]
pub async fn settle_expense(
    db: &DatabaseConnection,
    expense_id: i32,
    member_email: &str,
    amount_to_pay: Decimal,
) -> Result<bool, ServiceError> {
    expense::validate_amount(amount_to_pay)?;
    let txn = db.begin().await.map_err(db_err("settle_expense"))?;
    let Some(existing) = expense::Entity::find_by_id(expense_id).one(&txn).await.map_err(db_err("settle_expense"))? else {
        return Ok(false);
    };

    member_payment::create(&txn, expense_id, member_email, amount_to_pay).await?;
    let remaining = existing.amount - amount_to_pay;
    let mut am: expense::ActiveModel = existing.into();
    am.amount = Set(remaining);
    am.update(&txn).await.map_err(db_err("settle_expense"))?;

    txn.commit().await.map_err(db_err("settle_expense"))?;
    info!(expense_id, remaining = %remaining, "expense_settled");
    Ok(true)
}

pub async fn member_payments(db: &DatabaseConnection, expense_id: i32) -> Result<Vec<member_payment::Model>, ServiceError> {
    member_payment::Entity::find()
        .filter(member_payment::Column::ExpenseId.eq(expense_id))
        .order_by_asc(member_payment::Column::Id)
        .all(db)
        .await
        .map_err(db_err("member_payments"))
}

/// Overwrite description, amount, payer and group.
/// Returns `false` when the expense or the target group does not exist.
#[instrument(skip(db, input), fields(expense_id = input.expense_id))]
pub async fn update_expense(db: &DatabaseConnection, input: ExpenseUpdate) -> Result<bool, ServiceError> {
    expense::validate_description(&input.description)?;
    expense::validate_amount(input.amount)?;
    let Some(existing) = expense::Entity::find_by_id(input.expense_id).one(db).await.map_err(db_err("update_expense"))? else {
        return Ok(false);
    };
    if group::Entity::find_by_id(input.group_id).one(db).await.map_err(db_err("update_expense"))?.is_none() {
        return Ok(false);
    }
    let mut am: expense::ActiveModel = existing.into();
    am.description = Set(input.description.trim().to_string());
    am.amount = Set(input.amount);
    am.paid_by_email = Set(input.paid_by_email.trim().to_string());
    am.group_id = Set(input.group_id);
    am.update(db).await.map_err(db_err("update_expense"))?;
    Ok(true)
}

/// Delete an expense and its payments. Returns `false` when it does not exist.
#[instrument(skip(db))]
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i32) -> Result<bool, ServiceError> {
    let txn = db.begin().await.map_err(db_err("delete_expense"))?;
    if expense::Entity::find_by_id(expense_id).one(&txn).await.map_err(db_err("delete_expense"))?.is_none() {
        return Ok(false);
    }
    member_payment::Entity::delete_many()
        .filter(member_payment::Column::ExpenseId.eq(expense_id))
        .exec(&txn)
        .await
        .map_err(db_err("delete_expense"))?;
    expense::Entity::delete_by_id(expense_id).exec(&txn).await.map_err(db_err("delete_expense"))?;
    txn.commit().await.map_err(db_err("delete_expense"))?;
    info!(expense_id, "expense_deleted");
    Ok(true)
}

/// Lend/borrow summary for the user with `email`, or `None` if there is no such user.
///
/// Groups the user both created and joined are visited twice.
#[instrument(skip(db))]
pub async fn user_total_amounts(db: &DatabaseConnection, email: &str) -> Result<Option<UserDetail>, ServiceError> {
    let Some(u) = user::find_by_email(db, email).await? else {
        return Ok(None);
    };

    let as_member = group_membership::Entity::find()
        .filter(group_membership::Column::UserId.eq(u.id))
        .order_by_asc(group_membership::Column::Id)
        .all(db)
        .await
        .map_err(db_err("user_total_amounts"))?
        .into_iter()
        .map(|m| m.group_id);
    let as_creator = group::Entity::find()
        .filter(group::Column::CreatedBy.eq(u.email.as_str()))
        .order_by_asc(group::Column::Id)
        .all(db)
        .await
        .map_err(db_err("user_total_amounts"))?
        .into_iter()
        .map(|g| g.id);
    let group_ids: Vec<i32> = as_member.chain(as_creator).collect();

    let mut figures = Vec::with_capacity(group_ids.len());
    for group_id in group_ids {
        let expenses = expenses_by_group(db, group_id).await?;
        let (lend, borrow) = expenses.iter().fold((Decimal::ZERO, Decimal::ZERO), |(lend, borrow), e| {
            if e.paid_by_email == u.email { (lend + e.amount, borrow) } else { (lend, borrow + e.amount) }
        });
        let members = group_membership::Entity::find()
            .filter(group_membership::Column::GroupId.eq(group_id))
            .count(db)
            .await
            .map_err(db_err("user_total_amounts"))?;
        figures.push(GroupFigures { group_id, lend, borrow, members });
    }

    Ok(Some(aggregation::summarize(figures)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::group_service::{self, NewGroup};
    use crate::test_support::{get_db, seed_user};

    async fn group_with(db: &DatabaseConnection, creator: &str, members: &[&str]) -> Result<group::Model, anyhow::Error> {
        let g = group_service::create_group(db, NewGroup {
            group_name: "Household".into(),
            group_description: String::new(),
            created_by: creator.into(),
            created_date: None,
        })
        .await?;
        for m in members {
            group_service::add_member(db, g.id, m).await?;
        }
        Ok(g)
    }

    fn dec(v: i64) -> Decimal { Decimal::from(v) }

    fn new_expense(group_id: i32, payer: &str, amount: Decimal) -> NewExpense {
        NewExpense { description: "Groceries".into(), amount, paid_by_email: payer.into(), date: None, group_id }
    }

    #[tokio::test]
    async fn add_expense_requires_payer_and_group() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "payer@example.com").await?;
        let g = group_with(&db, "owner@example.com", &["payer@example.com"]).await?;

        assert!(!add_expense(&db, new_expense(g.id, "ghost@example.com", dec(10))).await?);
        assert!(!add_expense(&db, new_expense(g.id + 1, "payer@example.com", dec(10))).await?);
        assert!(add_expense(&db, new_expense(g.id, "payer@example.com", dec(10))).await?);
        assert_eq!(expenses_by_group(&db, g.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn settle_decrements_amount_and_records_payment() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "a@example.com").await?;
        let g = group_with(&db, "a@example.com", &["a@example.com"]).await?;
        add_expense(&db, new_expense(g.id, "a@example.com", dec(100))).await?;
        let e = expenses_by_group(&db, g.id).await?.remove(0);

        assert!(settle_expense(&db, e.id, "b@example.com", dec(30)).await?);
        assert!(settle_expense(&db, e.id, "b@example.com", dec(90)).await?);
        let after = expense::Entity::find_by_id(e.id).one(&db).await?.unwrap();
        assert_eq!(after.amount, dec(-20));

        let payments = member_payments(&db, e.id).await?;
        assert_eq!(payments.iter().map(|p| p.paid_amount).collect::<Vec<_>>(), vec![dec(30), dec(90)]);
        assert!(payments.iter().all(|p| p.member_email == "b@example.com"));
        Ok(())
    }

    #[tokio::test]
    async fn settling_in_cents_reaches_exactly_zero() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "cents@example.com").await?;
        let g = group_with(&db, "cents@example.com", &[]).await?;
        add_expense(&db, new_expense(g.id, "cents@example.com", Decimal::new(3, 1))).await?;
        let e = expenses_by_group(&db, g.id).await?.remove(0);

        assert!(settle_expense(&db, e.id, "m@example.com", Decimal::new(1, 1)).await?);
        assert!(settle_expense(&db, e.id, "m@example.com", Decimal::new(2, 1)).await?);
        let after = expense::Entity::find_by_id(e.id).one(&db).await?.unwrap();
        assert_eq!(after.amount, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn settle_rejects_sub_cent_payment() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res = settle_expense(&db, 1, "m@example.com", Decimal::new(5, 3)).await;
        assert!(matches!(res, Err(ServiceError::Model(models::errors::ModelError::Validation(_)))));
        Ok(())
    }

    #[tokio::test]
    async fn settle_unknown_expense_fails() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(!settle_expense(&db, 4242, "b@example.com", dec(5)).await?);
        assert!(member_payment::Entity::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_expense() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "u@example.com").await?;
        let g = group_with(&db, "u@example.com", &[]).await?;
        add_expense(&db, new_expense(g.id, "u@example.com", dec(12))).await?;
        let e = expenses_by_group(&db, g.id).await?.remove(0);

        let update = ExpenseUpdate {
            expense_id: e.id,
            description: "Dinner".into(),
            amount: dec(44),
            paid_by_email: "v@example.com".into(),
            group_id: g.id,
        };
        assert!(update_expense(&db, update.clone()).await?);
        let changed = expense::Entity::find_by_id(e.id).one(&db).await?.unwrap();
        assert_eq!(changed.description, "Dinner");
        assert_eq!(changed.amount, dec(44));
        assert_eq!(changed.paid_by_email, "v@example.com");

        assert!(!update_expense(&db, ExpenseUpdate { group_id: g.id + 9, ..update.clone() }).await?);
        assert!(!update_expense(&db, ExpenseUpdate { expense_id: e.id + 9, ..update }).await?);

        settle_expense(&db, e.id, "w@example.com", dec(4)).await?;
        assert!(delete_expense(&db, e.id).await?);
        assert!(member_payments(&db, e.id).await?.is_empty());
        assert!(!delete_expense(&db, e.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn totals_for_user_without_groups_are_zero() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "lonely@example.com").await?;
        let d = user_total_amounts(&db, "lonely@example.com").await?.unwrap();
        assert_eq!(d.total_lend_amount, dec(0));
        assert_eq!(d.total_borrowed_amount, dec(0));
        assert!(d.user_group_details.is_empty());
        assert!(user_total_amounts(&db, "ghost@example.com").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn two_members_split_one_expense() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "a@example.com").await?;
        seed_user(&db, "b@example.com").await?;
        // created by a third party so neither member is counted twice
        let g = group_with(&db, "host@example.com", &["a@example.com", "b@example.com"]).await?;
        add_expense(&db, new_expense(g.id, "a@example.com", dec(100))).await?;

        let a = user_total_amounts(&db, "a@example.com").await?.unwrap();
        assert_eq!(a.user_group_details[0].lend_amount_per_member, dec(50));
        assert_eq!(a.total_lend_amount, dec(50));
        assert_eq!(a.total_borrowed_amount, dec(0));

        let b = user_total_amounts(&db, "b@example.com").await?.unwrap();
        assert_eq!(b.user_group_details[0].borrowed_amount_per_member, dec(50));
        assert_eq!(b.total_borrowed_amount, dec(50));
        Ok(())
    }

    #[tokio::test]
    async fn creator_member_group_is_counted_twice() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_user(&db, "c@example.com").await?;
        seed_user(&db, "d@example.com").await?;
        let g = group_with(&db, "c@example.com", &["c@example.com", "d@example.com"]).await?;
        add_expense(&db, new_expense(g.id, "c@example.com", dec(100))).await?;

        let c = user_total_amounts(&db, "c@example.com").await?.unwrap();
        assert_eq!(c.user_group_details.len(), 2);
        assert!(c.user_group_details.iter().all(|d| d.group_id == g.id));
        // 200 summed over two entries, divided by 2 + 2 members
        assert_eq!(c.total_lend_amount, dec(50));
        Ok(())
    }
}
