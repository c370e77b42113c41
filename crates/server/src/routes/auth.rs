use std::sync::Arc;

use axum::{extract::{Request, State}, http::StatusCode, middleware::Next, response::Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;

use service::auth::{domain::{TokenClaims, ADMIN_ROLE}, repo::seaorm::SeaOrmAuthRepository, AuthConfig, AuthService};

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub expires_minutes: i64,
}

impl From<&configs::JwtConfig> for ServerAuthConfig {
    fn from(jwt: &configs::JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.key.clone(),
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            expires_minutes: jwt.expires_minutes,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    /// Auth service over the shared connection pool.
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository::new(self.db.clone()));
        let cfg = AuthConfig {
            jwt_secret: Some(self.auth.jwt_secret.clone()),
            issuer: self.auth.issuer.clone(),
            audience: self.auth.audience.clone(),
            expires_minutes: self.auth.expires_minutes,
            ..AuthConfig::default()
        };
        AuthService::new(repo, cfg)
    }
}

fn is_public(path: &str) -> bool {
    path == "/health" || path.starts_with("/api/account/") || path.starts_with("/api-docs")
}

/// Global middleware: every route except the public ones needs `Authorization: Bearer <token>`.
/// Missing header gives 400; malformed, invalid or expired tokens give 401.
/// Verified claims are stored in the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();

    if is_public(&path) || *req.method() == axum::http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let Some(h) = authz else {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(StatusCode::BAD_REQUEST);
        };
        let Some(t) = h.strip_prefix("Bearer ") else {
            tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
            return Err(StatusCode::UNAUTHORIZED);
        };
        t.trim().to_string()
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[state.auth.issuer.as_str()]);
    validation.set_audience(&[state.auth.audience.as_str()]);

    match decode::<TokenClaims>(&token, &key, &validation) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::error!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Route layer for admin-only endpoints; runs after [`require_bearer_token_state`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    let allowed = req
        .extensions()
        .get::<TokenClaims>()
        .map(|c| c.has_role(ADMIN_ROLE))
        .unwrap_or(false);
    if !allowed {
        tracing::warn!(path = %req.uri().path(), "admin role required");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        assert!(is_public("/health"));
        assert!(is_public("/api/account/login"));
        assert!(is_public("/api-docs/openapi.json"));
        assert!(!is_public("/api/group/getgroup"));
        assert!(!is_public("/api/accounts"));
    }
}
