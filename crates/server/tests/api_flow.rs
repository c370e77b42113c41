use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::{AppConfig, DatabaseConfig, JwtConfig};

async fn build_app() -> anyhow::Result<Router> {
    let cfg = AppConfig {
        database: DatabaseConfig::sqlite_in_memory(),
        jwt: JwtConfig { key: "integration-test-signing-key".into(), ..JwtConfig::default() },
        ..AppConfig::default()
    };
    Ok(server::build_app(&cfg).await?)
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, value))
}

async fn register_and_login(app: &Router, email: &str, role: Option<&str>) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/api/account/register", None,
        Some(json!({"name": "Tester", "email": email, "password": "pass#word", "role": role}))).await?;
    assert_eq!(status, StatusCode::OK, "register: {body}");
    assert_eq!(body["message"], "User Added");

    let (status, body) = send(app, "POST", "/api/account/login", None,
        Some(json!({"email": email, "password": "pass#word"}))).await?;
    assert_eq!(status, StatusCode::OK, "login: {body}");
    assert_eq!(body["message"], "Login Successful");
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn public_routes_need_no_token() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/expense/user-details/{email}"].is_object());
    Ok(())
}

#[tokio::test]
async fn protected_routes_check_bearer_token() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, _) = send(&app, "GET", "/api/group/getgroup", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/group/getgroup", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = register_and_login(&app, "reader@example.com", None).await?;
    let (status, body) = send(&app, "GET", "/api/group/getgroup", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn account_failures() -> anyhow::Result<()> {
    let app = build_app().await?;
    register_and_login(&app, "dup@example.com", None).await?;

    let (status, body) = send(&app, "POST", "/api/account/register", None,
        Some(json!({"name": "Again", "email": "dup@example.com", "password": "pass#word"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already taken.");
    assert_eq!(body["code"], 1002);

    let (status, _) = send(&app, "POST", "/api/account/register", None,
        Some(json!({"name": "Weak", "email": "weak@example.com", "password": "password"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long_role = "R".repeat(65);
    let (status, body) = send(&app, "POST", "/api/account/register", None,
        Some(json!({"name": "Role", "email": "role@example.com", "password": "pass#word", "role": long_role}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
    let (status, _) = send(&app, "GET", "/api/account/rolesByEmail?email=role@example.com", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    register_and_login(&app, "role@example.com", Some("Member")).await?;

    let (status, body) = send(&app, "POST", "/api/account/login", None,
        Some(json!({"email": "dup@example.com", "password": "wrong#pw"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid login attempt");

    let (status, body) = send(&app, "GET", "/api/account/rolesByEmail?email=dup@example.com", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["User"]));

    let (status, body) = send(&app, "GET", "/api/account/rolesByEmail?email=ghost@example.com", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    Ok(())
}

#[tokio::test]
async fn group_expense_settlement_flow() -> anyhow::Result<()> {
    let app = build_app().await?;
    let admin = register_and_login(&app, "a@example.com", Some("Admin")).await?;
    let user = register_and_login(&app, "b@example.com", None).await?;

    let (status, _) = send(&app, "POST", "/api/group/addgroup", Some(&user),
        Some(json!({"groupName": "Flat", "groupDescription": "Shared flat", "createdBy": "host@example.com"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, groups) = send(&app, "GET", "/api/group/getgroup", Some(&user), None).await?;
    let group_id = groups[0]["groupId"].as_i64().unwrap_or_default();

    let (status, _) = send(&app, "GET", &format!("/api/group/members/{group_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for email in ["a@example.com", "b@example.com"] {
        let (status, _) = send(&app, "POST", "/api/group/addmember", Some(&user),
            Some(json!({"groupId": group_id, "email": email}))).await?;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app, "POST", "/api/group/addmember", Some(&user),
        Some(json!({"groupId": group_id, "email": "b@example.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body[0]["description"], "User is already a member of this group");

    let (_, members) = send(&app, "GET", &format!("/api/group/members/{group_id}"), Some(&user), None).await?;
    assert_eq!(members.as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, "POST", "/api/expense/addexpense", Some(&user),
        Some(json!({"description": "Rent", "amount": 100.0, "paidByEmail": "a@example.com", "groupId": group_id}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/api/expense/addexpense", Some(&user),
        Some(json!({"description": "Rent", "amount": 100.0, "paidByEmail": "ghost@example.com", "groupId": group_id}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, expenses) = send(&app, "GET", &format!("/api/expense/getexpenses/{group_id}"), Some(&user), None).await?;
    let expense_id = expenses[0]["expenseId"].as_i64().unwrap_or_default();

    let (status, detail) = send(&app, "GET", "/api/expense/user-details/a@example.com", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["totalLendAmount"], 50.0);
    let (_, detail) = send(&app, "GET", "/api/expense/user-details/b@example.com", Some(&user), None).await?;
    assert_eq!(detail["totalBorrowedAmount"], 50.0);

    let (status, _) = send(&app, "PUT", "/api/expense/settleexpense", Some(&user),
        Some(json!({"expenseId": expense_id, "memberEmail": "b@example.com", "amountToPay": 50.0}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "PUT", "/api/expense/settleexpense", Some(&user),
        Some(json!({"expenseId": 9999, "memberEmail": "b@example.com", "amountToPay": 1.0}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, payments) = send(&app, "GET", &format!("/api/expense/getMemberPayments/{expense_id}"), Some(&user), None).await?;
    assert_eq!(payments[0]["paidAmount"], 50.0);
    let (_, expenses) = send(&app, "GET", &format!("/api/expense/getexpenses/{group_id}"), Some(&user), None).await?;
    assert_eq!(expenses[0]["amount"], 50.0);

    let update = json!({"expenseId": expense_id, "description": "Rent", "amount": 80.0, "paidByEmail": "a@example.com", "groupId": group_id});
    let (status, _) = send(&app, "PUT", "/api/expense/updateExpense", Some(&user), Some(update.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, "PUT", "/api/expense/updateExpense", Some(&admin), Some(update)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense Updated");

    let (status, _) = send(&app, "DELETE", &format!("/api/expense/deleteExpense/{expense_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &format!("/api/group/delete/{group_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Group Deleted");
    let (status, body) = send(&app, "GET", &format!("/api/group/{group_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
    let (_, expenses) = send(&app, "GET", &format!("/api/expense/getexpenses/{group_id}"), Some(&user), None).await?;
    assert_eq!(expenses, json!([]));
    let (status, _) = send(&app, "DELETE", &format!("/api/group/delete/{group_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
