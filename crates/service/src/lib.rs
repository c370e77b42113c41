//! Service layer providing business operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod aggregation;
pub mod db;
#[cfg(test)]
pub mod test_support;

pub use db::{expense_service, group_service};
