use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use strum::IntoEnumIterator;
use tracing::{error, info, warn};

use crate::api::back_url;
use crate::auth::auth::Authorized;
use crate::auth::gate::{AllLeaves, ApplyLeave, LeaveHistory, ReviewLeaves};
use crate::error::{AppResult, OrNotFound};
use crate::forms::leave_request::LeaveRequestForm;
use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::model::status::{Decision, Transition};
use crate::utils::flash::Flash;
use crate::utils::page::{render, render_invalid};

fn form_page(form: &LeaveRequestForm) -> serde_json::Value {
    json!({
        "form": form,
        "leave_types": LeaveType::iter().collect::<Vec<_>>(),
    })
}

/* =========================
Apply for leave (employee)
========================= */
#[utoipa::path(
    get,
    path = "/apply-leave",
    responses(
        (status = 200, description = "Blank leave request form", body = Object, example = json!({
            "page": "apply_leave",
            "messages": [],
            "form": {"leave_type": null, "start_date": null, "end_date": null, "reason": null, "attachment": null},
            "leave_types": ["casual", "annual", "sick"]
        })),
        (status = 303, description = "Not logged in as an employee; redirected to /login")
    ),
    tag = "Leave"
)]
pub async fn apply_leave_form(_auth: Authorized<ApplyLeave>, flash: Flash) -> HttpResponse {
    render(flash, "apply_leave", form_page(&LeaveRequestForm::default()))
}

#[utoipa::path(
    post,
    path = "/apply-leave",
    request_body(
        content = LeaveRequestForm,
        description = "Leave request payload",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Leave request submitted as pending; redirected to /leave-history"),
        (status = 422, description = "Form rejected; nothing stored", body = Object, example = json!({
            "page": "apply_leave",
            "errors": {"end_date": ["End date cannot be before start date."]}
        }))
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: Authorized<ApplyLeave>,
    pool: web::Data<SqlitePool>,
    form: web::Form<LeaveRequestForm>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;

    let leave = match form.clean() {
        Ok(leave) => leave,
        Err(errors) => return Ok(render_invalid(flash, "apply_leave", form_page(&form), &errors)),
    };

    let leave_id = LeaveRequest::insert(pool.get_ref(), employee.id, &leave)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = employee.id, "Failed to create leave request");
            e
        })?;

    info!(leave_id, employee_id = employee.id, leave_type = %leave.leave_type, "Leave request submitted");
    flash.success("Leave request submitted.");
    Ok(flash.redirect("/leave-history"))
}

#[utoipa::path(
    get,
    path = "/leave-history",
    responses(
        (status = 200, description = "Own leave requests, newest start date first", body = Object, example = json!({
            "page": "leave_history",
            "messages": [],
            "leaves": [{
                "id": 1, "employee_id": 7, "leave_type": "annual",
                "start_date": "2024-01-10", "end_date": "2024-01-12",
                "reason": "Family trip", "attachment": null, "status": "pending"
            }]
        }))
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    auth: Authorized<LeaveHistory>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;
    let leaves = LeaveRequest::list_for_employee(pool.get_ref(), employee.id).await?;

    Ok(render(flash, "leave_history", json!({ "leaves": leaves })))
}

/* =========================
Review (HR/Admin)
========================= */
#[utoipa::path(
    get,
    path = "/manage-leaves",
    responses(
        (status = 200, description = "Every leave request with its owner", body = Object, example = json!({
            "page": "manage_leaves",
            "messages": [{"level": "success", "text": "Leave approved successfully."}],
            "back_url": "/hr-home",
            "leaves": [{
                "id": 1, "employee_id": 7, "employee": "alice", "leave_type": "annual",
                "start_date": "2024-01-10", "end_date": "2024-01-12",
                "reason": "Family trip", "attachment": null, "status": "approved"
            }]
        }))
    ),
    tag = "Leave"
)]
pub async fn manage_leaves(
    auth: Authorized<ReviewLeaves>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let leaves = LeaveRequest::list_all(pool.get_ref()).await?;

    Ok(render(
        flash,
        "manage_leaves",
        json!({ "leaves": leaves, "back_url": back_url(auth.role) }),
    ))
}

#[utoipa::path(
    get,
    path = "/all-leaves",
    responses(
        (status = 200, description = "Every leave request, admin console", body = Object)
    ),
    tag = "Leave"
)]
pub async fn all_leaves(
    auth: Authorized<AllLeaves>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let leaves = LeaveRequest::list_all(pool.get_ref()).await?;

    Ok(render(
        flash,
        "manage_leaves",
        json!({ "leaves": leaves, "back_url": back_url(auth.role) }),
    ))
}

#[utoipa::path(
    post,
    path = "/approve-leave/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 303, description = "Reviewed; redirected to /manage-leaves with a one-shot message"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: Authorized<ReviewLeaves>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    review(&auth, pool.get_ref(), path.into_inner(), Decision::Approve, flash).await
}

#[utoipa::path(
    post,
    path = "/reject-leave/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 303, description = "Reviewed; redirected to /manage-leaves with a one-shot message"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: Authorized<ReviewLeaves>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    review(&auth, pool.get_ref(), path.into_inner(), Decision::Reject, flash).await
}

async fn review(
    auth: &Authorized<ReviewLeaves>,
    pool: &SqlitePool,
    leave_id: i64,
    decision: Decision,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let leave = LeaveRequest::find(pool, leave_id)
        .await?
        .or_not_found("Leave request")?;

    match leave.status.transition(decision) {
        Transition::Apply(status) => {
            if LeaveRequest::set_status_if_pending(pool, leave_id, status).await? {
                info!(leave_id, reviewer = auth.user_id, %status, "Leave request reviewed");
                match decision {
                    Decision::Approve => flash.success("Leave approved successfully."),
                    Decision::Reject => flash.warning("Leave rejected."),
                }
            } else {
                warn!(leave_id, reviewer = auth.user_id, "Leave request was reviewed concurrently");
                flash.warning("Leave request was already processed.");
            }
        }
        Transition::Unchanged => {
            warn!(leave_id, reviewer = auth.user_id, status = %leave.status, "Repeated review ignored");
            flash.info(format!("Leave request is already {}.", leave.status));
        }
        Transition::Refused { current } => {
            warn!(leave_id, reviewer = auth.user_id, %current, "Review of a closed leave request refused");
            flash.warning(format!(
                "Leave request is already {current} and cannot be changed."
            ));
        }
    }

    Ok(flash.redirect("/manage-leaves"))
}
