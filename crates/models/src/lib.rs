pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod role;
pub mod user_role;
pub mod group;
pub mod group_membership;
pub mod expense;
pub mod member_payment;
