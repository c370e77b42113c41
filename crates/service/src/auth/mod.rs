//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, role assignment and token issuance live here, behind
//! the [`repository::AuthRepository`] seam.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
