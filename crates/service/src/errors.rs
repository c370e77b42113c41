use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("User not found")]
    UserNotFound,
    #[error("Group not found")]
    GroupNotFound,
    #[error("User is already a member of this group")]
    AlreadyMember,
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

/// Map a database error into [`ServiceError::Db`], logging it under `op`.
pub(crate) fn db_err(op: &'static str) -> impl Fn(sea_orm::DbErr) -> ServiceError {
    move |e| {
        tracing::error!(op, error = %e, "database operation failed");
        ServiceError::Db(e.to_string())
    }
}
