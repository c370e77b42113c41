use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod account;
pub mod auth;
pub mod expenses;
pub mod groups;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public, protected and admin routes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/account/register", post(account::register))
        .route("/api/account/login", post(account::login))
        .route("/api/account/rolesByEmail", get(account::roles_by_email));

    let groups = Router::new()
        .route("/api/group/getgroup", get(groups::list))
        .route("/api/group/addgroup", post(groups::add))
        .route("/api/group/addmember", post(groups::add_member))
        .route("/api/group/:id", get(groups::get))
        .route("/api/group/edit/:id", put(groups::edit))
        .route("/api/group/delete/:id", delete(groups::delete))
        .route("/api/group/members/:group_id", get(groups::members))
        .route("/api/group/user/:email", get(groups::for_user));

    let expenses = Router::new()
        .route("/api/expense/addexpense", post(expenses::add))
        .route("/api/expense/getexpenses/:group_id", get(expenses::by_group))
        .route("/api/expense/settleexpense", put(expenses::settle))
        .route("/api/expense/getMemberPayments/:expense_id", get(expenses::member_payments))
        .route("/api/expense/user-details/:email", get(expenses::user_details));

    let admin = Router::new()
        .route("/api/expense/updateExpense", put(expenses::update))
        .route("/api/expense/deleteExpense/:id", delete(expenses::delete))
        .route_layer(middleware::from_fn(auth::require_admin));

    public
        .merge(groups)
        .merge(expenses)
        .merge(admin)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and other failures at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
