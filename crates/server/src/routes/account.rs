use axum::{extract::{Query, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use common::types::MessageBody;
use service::auth::{domain::{LoginInput, RegisterInput}, errors::AuthError};

use crate::{errors::JsonApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RolesQuery {
    pub email: String,
}

fn auth_error(e: AuthError) -> JsonApiError {
    match e {
        AuthError::Validation(_) | AuthError::DuplicateEmail => JsonApiError::bad_request(e.to_string()).with_code(e.code()),
        AuthError::Unauthorized => JsonApiError::new(StatusCode::UNAUTHORIZED, "Invalid login attempt", None),
        AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
            JsonApiError::internal("account", &e).with_code(e.code())
        }
    }
}

#[utoipa::path(
    post, path = "/api/account/register", tag = "account",
    request_body = RegisterRequest,
    responses((status = 200, description = "User Added"), (status = 400, description = "Validation failed or email taken"))
)]
pub async fn register(State(state): State<ServerState>, Json(req): Json<RegisterRequest>) -> Result<Json<MessageBody>, JsonApiError> {
    let input = RegisterInput { name: req.name, email: req.email, password: req.password, role: req.role };
    let user = state.auth_service().register(input).await.map_err(auth_error)?;
    info!(user_id = %user.id, "account registered");
    Ok(Json(MessageBody::new("User Added")))
}

#[utoipa::path(
    post, path = "/api/account/login", tag = "account",
    request_body = LoginRequest,
    responses((status = 200, description = "Login Successful", body = LoginResponse), (status = 401, description = "Invalid login attempt"))
)]
pub async fn login(State(state): State<ServerState>, Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>, JsonApiError> {
    let session = state
        .auth_service()
        .login(LoginInput { email: req.email, password: req.password })
        .await
        .map_err(auth_error)?;
    let token = session
        .token
        .ok_or_else(|| JsonApiError::internal("login", "token generation failed"))?;
    Ok(Json(LoginResponse { token, message: "Login Successful".into() }))
}

#[utoipa::path(
    get, path = "/api/account/rolesByEmail", tag = "account",
    params(RolesQuery),
    responses((status = 200, description = "Role names", body = [String]), (status = 404, description = "User not found"))
)]
pub async fn roles_by_email(State(state): State<ServerState>, Query(q): Query<RolesQuery>) -> Result<Json<Vec<String>>, JsonApiError> {
    match state.auth_service().roles_by_email(&q.email).await.map_err(auth_error)? {
        Some(roles) => Ok(Json(roles)),
        None => Err(JsonApiError::not_found("User not found")),
    }
}
