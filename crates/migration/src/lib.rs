//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240622_000001_create_user;
mod m20240622_000002_create_user_credentials;
mod m20240622_000003_create_role;
mod m20240622_000004_create_expense_group;
mod m20240622_000005_create_group_membership;
mod m20240622_000006_create_expense;
mod m20240623_000007_create_member_payment;
mod m20240623_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240622_000001_create_user::Migration),
            Box::new(m20240622_000002_create_user_credentials::Migration),
            Box::new(m20240622_000003_create_role::Migration),
            Box::new(m20240622_000004_create_expense_group::Migration),
            Box::new(m20240622_000005_create_group_membership::Migration),
            Box::new(m20240622_000006_create_expense::Migration),
            Box::new(m20240623_000007_create_member_payment::Migration),
            // Indexes should always be applied last
            Box::new(m20240623_000008_add_indexes::Migration),
        ]
    }
}
