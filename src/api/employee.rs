use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::auth::auth::{Authorized, SessionUser};
use crate::auth::gate::{AddEmployee, AddHr, AllEmployees, DeleteEmployee, EmployeeList};
use crate::auth::password::hash_password;
use crate::db::{is_foreign_key_violation, unique_violation_on};
use crate::error::AppResult;
use crate::forms::employee::EmployeeForm;
use crate::forms::{FormErrors, invalid_choice};
use crate::model::department::Department;
use crate::model::role::Role;
use crate::model::user::{NewUser, User};
use crate::utils::flash::Flash;
use crate::utils::page::{render, render_invalid};

const HR_ROLES: &[Role] = &[Role::Employee];
const HR_ROLE_ERROR: &str = "You are only allowed to add employees.";

const ADMIN_ROLES: &[Role] = &[Role::Hr, Role::Admin];
const ADMIN_ROLE_ERROR: &str = "You can only add HR or Admins.";

/// Who is adding an account, and what they may create.
struct Enrolment {
    page: &'static str,
    allowed: &'static [Role],
    outside_allowed: &'static str,
}

const BY_HR: Enrolment = Enrolment {
    page: "add_employee",
    allowed: HR_ROLES,
    outside_allowed: HR_ROLE_ERROR,
};

const BY_ADMIN: Enrolment = Enrolment {
    page: "add_hr",
    allowed: ADMIN_ROLES,
    outside_allowed: ADMIN_ROLE_ERROR,
};

async fn form_page(
    pool: &SqlitePool,
    enrolment: &Enrolment,
    form: &EmployeeForm,
) -> AppResult<serde_json::Value> {
    let departments = Department::list(pool).await?;
    Ok(json!({
        "form": form,
        "allowed_roles": enrolment.allowed,
        "departments": departments,
    }))
}

/// Validates, hashes and stores a new account. Store constraint failures come
/// back as field errors on the form.
async fn enrol(
    creator: &SessionUser,
    pool: &SqlitePool,
    enrolment: Enrolment,
    form: &EmployeeForm,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let valid = match form.clean(enrolment.allowed, enrolment.outside_allowed) {
        Ok(valid) => valid,
        Err(errors) => {
            let body = form_page(pool, &enrolment, form).await?;
            return Ok(render_invalid(flash, enrolment.page, body, &errors));
        }
    };

    let new_user = NewUser {
        password_hash: hash_password(&valid.password)?,
        username: valid.username,
        email: valid.email,
        role: valid.role,
        department_id: valid.department_id,
        employee_code: valid.employee_code,
    };

    match User::insert(pool, &new_user).await {
        Ok(user_id) => {
            info!(user_id, created_by = creator.user_id, role = %new_user.role, "Account created");
            flash.success(format!("{} created successfully.", new_user.role.title()));
            Ok(flash.redirect(creator.role.home_path()))
        }
        Err(e) => {
            let errors = if unique_violation_on(&e, "users.employee_code") {
                FormErrors::single("employee_code", "User with this Employee code already exists.")
            } else if unique_violation_on(&e, "users.username") {
                FormErrors::single("username", "A user with that username already exists.")
            } else if is_foreign_key_violation(&e) {
                let department = form.department.as_deref().unwrap_or_default();
                FormErrors::single("department", invalid_choice(department))
            } else {
                error!(error = %e, created_by = creator.user_id, "Failed to create account");
                return Err(e.into());
            };

            info!(created_by = creator.user_id, errors = ?errors, "Account rejected by the store");
            let body = form_page(pool, &enrolment, form).await?;
            Ok(render_invalid(flash, enrolment.page, body, &errors))
        }
    }
}

/* =========================
Add employee (HR)
========================= */
#[utoipa::path(
    get,
    path = "/add-employee",
    responses(
        (status = 200, description = "Blank account form; only the employee role is offered", body = Object, example = json!({
            "page": "add_employee",
            "messages": [],
            "form": {"username": null, "email": null, "role": null, "department": null, "employee_code": null},
            "allowed_roles": ["employee"],
            "departments": [{"id": 1, "name": "Engineering"}]
        }))
    ),
    tag = "Roster"
)]
pub async fn add_employee_form(
    _auth: Authorized<AddEmployee>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let body = form_page(pool.get_ref(), &BY_HR, &EmployeeForm::default()).await?;
    Ok(render(flash, BY_HR.page, body))
}

#[utoipa::path(
    post,
    path = "/add-employee",
    request_body(
        content = EmployeeForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Employee created; redirected to /hr-home"),
        (status = 422, description = "Form rejected; nothing stored", body = Object, example = json!({
            "page": "add_employee",
            "errors": {"role": ["You are only allowed to add employees."]}
        }))
    ),
    tag = "Roster"
)]
pub async fn add_employee(
    auth: Authorized<AddEmployee>,
    pool: web::Data<SqlitePool>,
    form: web::Form<EmployeeForm>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    enrol(&auth, pool.get_ref(), BY_HR, &form, flash).await
}

/* =========================
Add HR or admin (admin)
========================= */
#[utoipa::path(
    get,
    path = "/add-hr",
    responses(
        (status = 200, description = "Blank account form; hr and admin roles are offered", body = Object)
    ),
    tag = "Roster"
)]
pub async fn add_hr_form(
    _auth: Authorized<AddHr>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let body = form_page(pool.get_ref(), &BY_ADMIN, &EmployeeForm::default()).await?;
    Ok(render(flash, BY_ADMIN.page, body))
}

#[utoipa::path(
    post,
    path = "/add-hr",
    request_body(
        content = EmployeeForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Account created; redirected to /admin-home"),
        (status = 422, description = "Form rejected; nothing stored", body = Object, example = json!({
            "page": "add_hr",
            "errors": {"role": ["You can only add HR or Admins."]}
        }))
    ),
    tag = "Roster"
)]
pub async fn add_hr(
    auth: Authorized<AddHr>,
    pool: web::Data<SqlitePool>,
    form: web::Form<EmployeeForm>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    enrol(&auth, pool.get_ref(), BY_ADMIN, &form, flash).await
}

/* =========================
Listings
========================= */
#[utoipa::path(
    get,
    path = "/employee-list",
    responses(
        (status = 200, description = "Every employee with department name", body = Object, example = json!({
            "page": "employee_list",
            "messages": [],
            "employees": [{"id": 7, "username": "alice", "email": "alice@company.com", "role": "employee",
                           "department_id": 1, "department": "Engineering", "employee_code": "EMP001"}]
        }))
    ),
    tag = "Roster"
)]
pub async fn employee_list(
    _auth: Authorized<EmployeeList>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employees = User::list_by_role(pool.get_ref(), Role::Employee).await?;
    Ok(render(flash, "employee_list", json!({ "employees": employees })))
}

#[utoipa::path(
    get,
    path = "/all-employees",
    responses(
        (status = 200, description = "Every HR and employee account", body = Object)
    ),
    tag = "Roster"
)]
pub async fn all_employees(
    _auth: Authorized<AllEmployees>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employees = User::list_non_admin(pool.get_ref()).await?;
    Ok(render(flash, "all_employees", json!({ "employees": employees })))
}

/* =========================
Delete (admin)
========================= */
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteEmployeeForm {
    #[schema(example = 7)]
    pub employee_id: i64,
}

#[utoipa::path(
    get,
    path = "/delete-employee",
    responses(
        (status = 200, description = "Accounts that may be deleted (admins are never listed)", body = Object)
    ),
    tag = "Roster"
)]
pub async fn delete_employee_form(
    _auth: Authorized<DeleteEmployee>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employees = User::list_non_admin(pool.get_ref()).await?;
    Ok(render(flash, "delete_employee", json!({ "employees": employees })))
}

#[utoipa::path(
    post,
    path = "/delete-employee",
    request_body(
        content = DeleteEmployeeForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Deleted together with the account's requests and attendance, or refused for an admin; redirected to /delete-employee")
    ),
    tag = "Roster"
)]
pub async fn delete_employee(
    auth: Authorized<DeleteEmployee>,
    pool: web::Data<SqlitePool>,
    form: web::Form<DeleteEmployeeForm>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let employee_id = form.employee_id;

    match User::find(pool.get_ref(), employee_id).await? {
        None => {
            warn!(employee_id, deleted_by = auth.user_id, "Delete of unknown account ignored");
            flash.warning("Employee not found.");
        }
        Some(target) if target.role == Role::Admin => {
            warn!(employee_id, deleted_by = auth.user_id, "Refused to delete an admin account");
            flash.error("Admin accounts cannot be deleted.");
        }
        Some(target) => {
            if User::delete_non_admin(pool.get_ref(), employee_id).await? > 0 {
                info!(employee_id, deleted_by = auth.user_id, username = %target.username, "Account deleted");
                flash.success(format!("{} deleted successfully.", target.username));
            } else {
                flash.warning("Employee not found.");
            }
        }
    }

    Ok(flash.redirect("/delete-employee"))
}
