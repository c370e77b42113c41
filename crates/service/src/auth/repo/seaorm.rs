use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use models::{errors::ModelError, role, user, user_credentials, user_role};

use crate::auth::domain::{AuthUser, Credentials, NewAccount};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_auth_user(u: user::Model) -> AuthUser {
    AuthUser { id: u.id, email: u.email, name: u.name }
}

fn repo_err(e: impl std::fmt::Display) -> AuthError {
    AuthError::Repository(e.to_string())
}

async fn insert_account(txn: &DatabaseTransaction, account: NewAccount) -> Result<AuthUser, AuthError> {
    let created = user::create(txn, &account.email, &account.name).await.map_err(|e| match e {
        ModelError::Duplicate(_) => AuthError::DuplicateEmail,
        ModelError::Validation(msg) => AuthError::Validation(msg),
        other => repo_err(other),
    })?;
    user_credentials::upsert_password(txn, created.id, account.password_hash, &account.password_algorithm)
        .await
        .map_err(repo_err)?;
    let r = role::find_or_create(txn, &account.role).await.map_err(repo_err)?;
    user_role::assign(txn, created.id, r.id).await.map_err(repo_err)?;
    Ok(to_auth_user(created))
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_email(&self.db, email).await.map_err(repo_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn register_user(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        match insert_account(&txn, account).await {
            Ok(user) => {
                txn.commit().await.map_err(repo_err)?;
                Ok(user)
            }
            Err(e) => {
                txn.rollback().await.map_err(repo_err)?;
                Err(e)
            }
        }
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = user_credentials::find_by_user(&self.db, user_id).await.map_err(repo_err)?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AuthError> {
        role::names_for_user(&self.db, user_id).await.map_err(repo_err)
    }
}
