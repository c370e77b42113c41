//! Lend/borrow arithmetic behind the per-user summary.
//!
//! The database side collects one [`GroupFigures`] per group id the user is
//! attached to; [`summarize`] turns them into a [`UserDetail`].
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw sums fetched for one group, seen from one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupFigures {
    pub group_id: i32,
    /// Expenses in the group paid by the user.
    pub lend: Decimal,
    /// Expenses in the group paid by anyone else.
    pub borrow: Decimal,
    pub members: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupDetail {
    pub group_id: i32,
    pub total_lend_amount: Decimal,
    pub total_borrowed_amount: Decimal,
    pub total_members: u64,
    pub borrowed_amount_per_member: Decimal,
    pub lend_amount_per_member: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub total_lend_amount: Decimal,
    pub total_borrowed_amount: Decimal,
    pub user_group_details: Vec<UserGroupDetail>,
}

fn per_member(total: Decimal, members: u64) -> Decimal {
    if members > 0 { total / Decimal::from(members) } else { Decimal::ZERO }
}

impl From<GroupFigures> for UserGroupDetail {
    fn from(f: GroupFigures) -> Self {
        Self {
            group_id: f.group_id,
            total_lend_amount: f.lend,
            total_borrowed_amount: f.borrow,
            total_members: f.members,
            borrowed_amount_per_member: per_member(f.borrow, f.members),
            lend_amount_per_member: per_member(f.lend, f.members),
        }
    }
}

/// Per-group shares plus grand totals. Totals are divided by the member count
/// summed over every entry, so a group listed twice is weighted twice.
pub fn summarize<I>(figures: I) -> UserDetail
where
    I: IntoIterator<Item = GroupFigures>,
{
    let user_group_details: Vec<UserGroupDetail> = figures.into_iter().map(UserGroupDetail::from).collect();

    let mut total_lend_amount: Decimal = user_group_details.iter().map(|g| g.total_lend_amount).sum();
    let mut total_borrowed_amount: Decimal = user_group_details.iter().map(|g| g.total_borrowed_amount).sum();
    let members: u64 = user_group_details.iter().map(|g| g.total_members).sum();
    if members > 0 {
        total_lend_amount /= Decimal::from(members);
        total_borrowed_amount /= Decimal::from(members);
    }

    UserDetail { total_lend_amount, total_borrowed_amount, user_group_details }
}
