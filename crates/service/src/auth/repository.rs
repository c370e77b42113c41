use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, NewAccount};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;

    /// Store the user, its password hash and its role. Either all of it is
    /// written or none of it; a taken email gives [`AuthError::DuplicateEmail`].
    async fn register_user(&self, account: NewAccount) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>,         // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>,        // key: user_id
        roles: Mutex<HashMap<Uuid, BTreeSet<String>>>,   // key: user_id
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn register_user(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&account.email) {
                return Err(AuthError::DuplicateEmail);
            }
            let user = AuthUser { id: Uuid::new_v4(), email: account.email.clone(), name: account.name };
            let cred = Credentials {
                user_id: user.id,
                password_hash: account.password_hash,
                password_algorithm: account.password_algorithm,
            };
            self.creds.lock().unwrap().insert(user.id, cred);
            self.roles.lock().unwrap().entry(user.id).or_default().insert(account.role);
            users.insert(account.email, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AuthError> {
            let roles = self.roles.lock().unwrap();
            Ok(roles.get(&user_id).map(|r| r.iter().cloned().collect()).unwrap_or_default())
        }
    }
}
