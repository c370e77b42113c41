//! Database-backed business operations, one module per aggregate.

pub mod group_service;
pub mod expense_service;
