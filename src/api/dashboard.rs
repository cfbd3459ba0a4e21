use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::auth::Authorized;
use crate::auth::gate::{AdminHome, EmployeeHome, HrHome};
use crate::config::Config;
use crate::error::AppResult;
use crate::model::leave_balance::remaining_leaves;
use crate::model::leave_request::LeaveRequest;
use crate::utils::flash::Flash;
use crate::utils::page::render;

#[utoipa::path(
    get,
    path = "/admin-home",
    responses(
        (status = 200, description = "Admin landing page", body = Object, example = json!({
            "page": "admin_home",
            "messages": [{"level": "success", "text": "Admin created successfully."}]
        })),
        (status = 303, description = "Not logged in as an admin; redirected to /login")
    ),
    tag = "Dashboard"
)]
pub async fn admin_home(_auth: Authorized<AdminHome>, flash: Flash) -> HttpResponse {
    render(flash, "admin_home", json!({}))
}

#[utoipa::path(
    get,
    path = "/hr-home",
    responses(
        (status = 200, description = "HR landing page", body = Object, example = json!({
            "page": "hr_home",
            "messages": []
        })),
        (status = 303, description = "Not logged in as HR; redirected to /login")
    ),
    tag = "Dashboard"
)]
pub async fn hr_home(_auth: Authorized<HrHome>, flash: Flash) -> HttpResponse {
    render(flash, "hr_home", json!({}))
}

#[utoipa::path(
    get,
    path = "/employee-home",
    responses(
        (status = 200, description = "Own record and the days left per leave type", body = Object, example = json!({
            "page": "employee_home",
            "messages": [],
            "employee": {"id": 7, "username": "alice", "email": "alice@company.com", "role": "employee",
                         "department_id": null, "department": null, "employee_code": "EMP001"},
            "remaining_leaves": {"annual": 17, "sick": 6, "casual": 6}
        })),
        (status = 303, description = "Not logged in as an employee; redirected to /login")
    ),
    tag = "Dashboard"
)]
pub async fn employee_home(
    auth: Authorized<EmployeeHome>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;

    // Recomputed on every view; nothing is cached.
    let approved = LeaveRequest::list_approved_for_employee(pool.get_ref(), employee.id).await?;
    let remaining = remaining_leaves(&config.leave_policy, &approved);

    tracing::debug!(employee_id = employee.id, ?remaining, "Leave balance computed");

    Ok(render(
        flash,
        "employee_home",
        json!({
            "employee": employee.summary(),
            "remaining_leaves": remaining,
        }),
    ))
}
