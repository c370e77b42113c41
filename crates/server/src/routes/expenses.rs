use axum::{extract::{Path, State}, Json};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use common::types::MessageBody;
use models::{expense, member_payment};
use service::{aggregation::UserDetail, expense_service::{self, ExpenseUpdate, NewExpense}};

use crate::{errors::JsonApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: Decimal,
    pub paid_by_email: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTimeWithTimeZone>,
    pub group_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettleExpenseRequest {
    pub expense_id: i32,
    pub member_email: String,
    pub amount_to_pay: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub expense_id: i32,
    pub description: String,
    pub amount: Decimal,
    pub paid_by_email: String,
    pub group_id: i32,
}

#[utoipa::path(
    post, path = "/api/expense/addexpense", tag = "expense",
    request_body = AddExpenseRequest,
    responses((status = 200, description = "Expense added"), (status = 400, description = "User or Group not found"))
)]
pub async fn add(State(state): State<ServerState>, Json(req): Json<AddExpenseRequest>) -> Result<Json<MessageBody>, JsonApiError> {
    let input = NewExpense {
        description: req.description,
        amount: req.amount,
        paid_by_email: req.paid_by_email,
        date: req.date,
        group_id: req.group_id,
    };
    if !expense_service::add_expense(&state.db, input).await? {
        return Err(JsonApiError::bad_request("Failed to add expense. User or Group not found."));
    }
    Ok(Json(MessageBody::new("Expense added successfully!")))
}

#[utoipa::path(
    get, path = "/api/expense/getexpenses/{groupId}", tag = "expense",
    params(("groupId" = i32, Path, description = "Group id")),
    responses((status = 200, description = "Expenses of the group"))
)]
pub async fn by_group(State(state): State<ServerState>, Path(group_id): Path<i32>) -> Result<Json<Vec<expense::Model>>, JsonApiError> {
    Ok(Json(expense_service::expenses_by_group(&state.db, group_id).await?))
}

#[utoipa::path(
    put, path = "/api/expense/settleexpense", tag = "expense",
    request_body = SettleExpenseRequest,
    responses((status = 200, description = "Payment recorded"), (status = 400, description = "Failed to update expense."))
)]
pub async fn settle(State(state): State<ServerState>, Json(req): Json<SettleExpenseRequest>) -> Result<Json<MessageBody>, JsonApiError> {
    if !expense_service::settle_expense(&state.db, req.expense_id, &req.member_email, req.amount_to_pay).await? {
        return Err(JsonApiError::bad_request("Failed to update expense."));
    }
    Ok(Json(MessageBody::new("Expense updated successfully!")))
}

#[utoipa::path(
    get, path = "/api/expense/getMemberPayments/{expenseId}", tag = "expense",
    params(("expenseId" = i32, Path, description = "Expense id")),
    responses((status = 200, description = "Payments recorded against the expense"))
)]
pub async fn member_payments(State(state): State<ServerState>, Path(expense_id): Path<i32>) -> Result<Json<Vec<member_payment::Model>>, JsonApiError> {
    Ok(Json(expense_service::member_payments(&state.db, expense_id).await?))
}

#[utoipa::path(
    put, path = "/api/expense/updateExpense", tag = "expense",
    request_body = UpdateExpenseRequest,
    responses((status = 200, description = "Expense Updated"), (status = 400, description = "Failed to update expense."), (status = 403, description = "Admin role required"))
)]
pub async fn update(State(state): State<ServerState>, Json(req): Json<UpdateExpenseRequest>) -> Result<Json<MessageBody>, JsonApiError> {
    let input = ExpenseUpdate {
        expense_id: req.expense_id,
        description: req.description,
        amount: req.amount,
        paid_by_email: req.paid_by_email,
        group_id: req.group_id,
    };
    if !expense_service::update_expense(&state.db, input).await? {
        return Err(JsonApiError::bad_request("Failed to update expense."));
    }
    Ok(Json(MessageBody::new("Expense Updated")))
}

#[utoipa::path(
    delete, path = "/api/expense/deleteExpense/{id}", tag = "expense",
    params(("id" = i32, Path, description = "Expense id")),
    responses((status = 200, description = "Expense deleted"), (status = 400, description = "Failed to delete expense."), (status = 403, description = "Admin role required"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<MessageBody>, JsonApiError> {
    if !expense_service::delete_expense(&state.db, id).await? {
        return Err(JsonApiError::bad_request("Failed to delete expense."));
    }
    info!(expense_id = id, "expense deleted");
    Ok(Json(MessageBody::new("Expense deleted")))
}

#[utoipa::path(
    get, path = "/api/expense/user-details/{email}", tag = "expense",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Lend/borrow summary"), (status = 404, description = "User not found"))
)]
pub async fn user_details(State(state): State<ServerState>, Path(email): Path<String>) -> Result<Json<UserDetail>, JsonApiError> {
    expense_service::user_total_amounts(&state.db, &email)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("User not found"))
}
