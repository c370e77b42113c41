use utoipa::OpenApi;

use crate::routes::{account, expenses, groups};

#[derive(utoipa::ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        account::register,
        account::login,
        account::roles_by_email,
        groups::list,
        groups::get,
        groups::add,
        groups::edit,
        groups::delete,
        groups::add_member,
        groups::members,
        groups::for_user,
        expenses::add,
        expenses::by_group,
        expenses::settle,
        expenses::member_payments,
        expenses::update,
        expenses::delete,
        expenses::user_details,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            account::RegisterRequest,
            account::LoginRequest,
            account::LoginResponse,
            groups::AddGroupRequest,
            groups::EditGroupRequest,
            groups::AddMemberRequest,
            expenses::AddExpenseRequest,
            expenses::SettleExpenseRequest,
            expenses::UpdateExpenseRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "account"),
        (name = "group"),
        (name = "expense")
    )
)]
pub struct ApiDoc;
