use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{encode, Header as JwtHeader, EncodingKey};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};
use uuid::Uuid;

use models::{role, user};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession, NewAccount, TokenClaims, DEFAULT_ROLE};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing key; no token is issued when absent.
    pub jwt_secret: Option<String>,
    pub issuer: String,
    pub audience: String,
    pub expires_minutes: i64,
    pub password_algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let jwt = configs::JwtConfig::default();
        Self {
            jwt_secret: None,
            issuer: jwt.issuer,
            audience: jwt.audience,
            expires_minutes: jwt.expires_minutes,
            password_algorithm: "argon2".into(),
        }
    }
}

impl From<&configs::JwtConfig> for AuthConfig {
    fn from(jwt: &configs::JwtConfig) -> Self {
        Self {
            jwt_secret: Some(jwt.key.clone()),
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            expires_minutes: jwt.expires_minutes,
            password_algorithm: "argon2".into(),
        }
    }
}

/// Minimum length 5 with at least one non-alphanumeric character.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < 5 {
        return Err(AuthError::Validation("Passwords must be at least 5 characters.".into()));
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(AuthError::Validation("Passwords must have at least one non alphanumeric character.".into()));
    }
    Ok(())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password and a role (`User` when none is given).
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret#1".into(), role: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("Name is required.".into()));
        }
        let email = input.email.trim();
        user::validate_email(email).map_err(|_| AuthError::Validation("Email is invalid.".into()))?;
        user::validate_name(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate_password(&input.password)?;
        let role = input
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ROLE);
        role::validate_name(role).map_err(|e| AuthError::Validation(e.to_string()))?;

        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::DuplicateEmail);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self
            .repo
            .register_user(NewAccount {
                email: email.to_string(),
                name: input.name.trim().to_string(),
                password_hash,
                password_algorithm: self.cfg.password_algorithm.clone(),
                role: role.to_string(),
            })
            .await?;
        info!(user_id = %user.id, email = %user.email, role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token when a signing key is configured.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { jwt_secret: Some("0123456789abcdef".into()), ..AuthConfig::default() };
    /// let svc = AuthService::new(repo.clone(), cfg);
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd!".into(), role: Some("Admin".into()) }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(session.roles, vec!["Admin".to_string()]);
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let roles = self.repo.roles_for_user(user.id).await?;
        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(self.issue_token(secret, &user, &roles)?),
            None => None,
        };
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, roles, token })
    }

    /// Roles held by the account with `email`, or `None` if there is no such account.
    #[instrument(skip(self))]
    pub async fn roles_by_email(&self, email: &str) -> Result<Option<Vec<String>>, AuthError> {
        match self.repo.find_user_by_email(email).await? {
            Some(user) => Ok(Some(self.repo.roles_for_user(user.id).await?)),
            None => Ok(None),
        }
    }

    fn issue_token(&self, secret: &str, user: &AuthUser, roles: &[String]) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::minutes(self.cfg.expires_minutes)).timestamp() as usize;
        let claims = TokenClaims {
            sub: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            uid: user.id.to_string(),
            roles: roles.to_vec(),
            iss: self.cfg.issuer.clone(),
            aud: self.cfg.audience.clone(),
            exp,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;
    use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};

    const KEY: &str = "unit-test-signing-key";

    fn svc() -> AuthService<MockAuthRepository> {
        let cfg = AuthConfig { jwt_secret: Some(KEY.into()), ..AuthConfig::default() };
        AuthService::new(Arc::new(MockAuthRepository::default()), cfg)
    }

    fn input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { name: "Tester".into(), email: email.into(), password: password.into(), role: None }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let s = svc();
        s.register(input("dup@example.com", "abc#1")).await.unwrap();
        let err = s.register(input("dup@example.com", "abc#1")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(err.to_string(), "Email is already taken.");
        assert_eq!(err.code(), 1002);
    }

    #[test]
    fn password_policy() {
        assert!(validate_password("ab#").is_err());
        assert!(validate_password("abcdef1").is_err());
        assert!(validate_password("abc#1").is_ok());
    }

    #[tokio::test]
    async fn invalid_email_and_blank_name_fail_validation() {
        let s = svc();
        assert!(matches!(s.register(input("nope", "abc#1")).await, Err(AuthError::Validation(_))));
        let mut blank = input("x@example.com", "abc#1");
        blank.name = "  ".into();
        assert!(matches!(s.register(blank).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn over_long_role_stores_nothing() {
        let s = svc();
        let mut bad = input("role@example.com", "abc#12");
        bad.role = Some("R".repeat(65));
        let err = s.register(bad).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(err.code(), 1001);
        assert!(s.roles_by_email("role@example.com").await.unwrap().is_none());

        let mut good = input("role@example.com", "abc#12");
        good.role = Some("Member".into());
        s.register(good).await.unwrap();
        assert_eq!(s.roles_by_email("role@example.com").await.unwrap(), Some(vec!["Member".to_string()]));
    }

    #[tokio::test]
    async fn default_role_and_token_claims() {
        let s = svc();
        s.register(input("claims@example.com", "abc#12")).await.unwrap();
        let session = s.login(LoginInput { email: "claims@example.com".into(), password: "abc#12".into() }).await.unwrap();
        assert_eq!(session.roles, vec![DEFAULT_ROLE.to_string()]);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[AuthConfig::default().issuer]);
        validation.set_audience(&[AuthConfig::default().audience]);
        let token = session.token.unwrap();
        let data = decode::<TokenClaims>(&token, &DecodingKey::from_secret(KEY.as_bytes()), &validation).unwrap();
        assert_eq!(data.claims.sub, "claims@example.com");
        assert_eq!(data.claims.uid, session.user.id.to_string());
        assert!(data.claims.has_role(DEFAULT_ROLE));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let s = svc();
        s.register(input("pw@example.com", "abc#12")).await.unwrap();
        let wrong = s.login(LoginInput { email: "pw@example.com".into(), password: "zzz#12".into() }).await;
        assert!(matches!(wrong, Err(AuthError::Unauthorized)));
        let unknown = s.login(LoginInput { email: "ghost@example.com".into(), password: "abc#12".into() }).await;
        assert!(matches!(unknown, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn roles_by_email_none_for_unknown_user() {
        let s = svc();
        assert!(s.roles_by_email("ghost@example.com").await.unwrap().is_none());
        let mut admin = input("admin@example.com", "abc#12");
        admin.role = Some("Admin".into());
        s.register(admin).await.unwrap();
        assert_eq!(s.roles_by_email("admin@example.com").await.unwrap(), Some(vec!["Admin".to_string()]));
    }
}
