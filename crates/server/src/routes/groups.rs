use axum::{extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use common::types::MessageBody;
use models::{group, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use service::{errors::ServiceError, group_service::{self, NewGroup}};

use crate::{errors::JsonApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupRequest {
    pub group_name: String,
    #[serde(default)]
    pub group_description: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_date: Option<DateTimeWithTimeZone>,
    pub created_by: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditGroupRequest {
    pub group_name: String,
    #[serde(default)]
    pub group_description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub group_id: i32,
    pub email: String,
}

#[utoipa::path(get, path = "/api/group/getgroup", tag = "group", responses((status = 200, description = "All groups")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<group::Model>>, JsonApiError> {
    let groups = group_service::list_groups(&state.db).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get, path = "/api/group/{id}", tag = "group",
    params(("id" = i32, Path, description = "Group id")),
    responses((status = 200, description = "Group"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<group::Model>, JsonApiError> {
    group_service::get_group(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Not Found"))
}

#[utoipa::path(
    post, path = "/api/group/addgroup", tag = "group",
    request_body = AddGroupRequest,
    responses((status = 200, description = "Group added"), (status = 400, description = "Validation Error"))
)]
pub async fn add(State(state): State<ServerState>, Json(req): Json<AddGroupRequest>) -> Result<Json<MessageBody>, JsonApiError> {
    let input = NewGroup {
        group_name: req.group_name,
        group_description: req.group_description,
        created_by: req.created_by,
        created_date: req.created_date,
    };
    let created = group_service::create_group(&state.db, input).await?;
    info!(group_id = created.id, "group added");
    Ok(Json(MessageBody::new("Group added successfully!!!")))
}

#[utoipa::path(
    put, path = "/api/group/edit/{id}", tag = "group",
    params(("id" = i32, Path, description = "Group id")),
    request_body = EditGroupRequest,
    responses((status = 200, description = "Group updated"), (status = 404, description = "Group not found"))
)]
pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(req): Json<EditGroupRequest>,
) -> Result<Json<MessageBody>, JsonApiError> {
    if group_service::update_group(&state.db, id, &req.group_name, &req.group_description).await? {
        Ok(Json(MessageBody::new("Group updated successfully")))
    } else {
        Err(JsonApiError::not_found("Group not found"))
    }
}

#[utoipa::path(
    delete, path = "/api/group/delete/{id}", tag = "group",
    params(("id" = i32, Path, description = "Group id")),
    responses((status = 200, description = "Group Deleted"), (status = 404, description = "Group not found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<MessageBody>, JsonApiError> {
    if group_service::delete_group(&state.db, id).await? {
        Ok(Json(MessageBody::new("Group Deleted")))
    } else {
        Err(JsonApiError::not_found("Group not found"))
    }
}

/// Membership failures come back as a list of `{description}` objects.
#[utoipa::path(
    post, path = "/api/group/addmember", tag = "group",
    request_body = AddMemberRequest,
    responses((status = 200, description = "Member added"), (status = 400, description = "User or group missing, or already a member"))
)]
pub async fn add_member(State(state): State<ServerState>, Json(req): Json<AddMemberRequest>) -> Result<Response, JsonApiError> {
    match group_service::add_member(&state.db, req.group_id, &req.email).await {
        Ok(_) => Ok(Json(MessageBody::new("Member added successfully")).into_response()),
        Err(e @ (ServiceError::UserNotFound | ServiceError::GroupNotFound | ServiceError::AlreadyMember)) => {
            let body = serde_json::json!([{ "description": e.to_string() }]);
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get, path = "/api/group/members/{groupId}", tag = "group",
    params(("groupId" = i32, Path, description = "Group id")),
    responses((status = 200, description = "Member users"), (status = 404, description = "No members found for the group"))
)]
pub async fn members(State(state): State<ServerState>, Path(group_id): Path<i32>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    let users = group_service::members(&state.db, group_id).await?;
    if users.is_empty() {
        return Err(JsonApiError::not_found("No members found for the group"));
    }
    Ok(Json(users))
}

#[utoipa::path(
    get, path = "/api/group/user/{email}", tag = "group",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Groups the user created or joined"))
)]
pub async fn for_user(State(state): State<ServerState>, Path(email): Path<String>) -> Result<Json<Vec<group::Model>>, JsonApiError> {
    let groups = group_service::groups_for_user(&state.db, &email).await?;
    Ok(Json(groups))
}
