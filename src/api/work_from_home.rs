use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::api::back_url;
use crate::auth::auth::Authorized;
use crate::auth::gate::{RequestWfh, ReviewWfh, WfhHistory};
use crate::error::{AppResult, OrNotFound};
use crate::forms::work_from_home::WorkFromHomeForm;
use crate::model::status::{Decision, Transition};
use crate::model::work_from_home::WorkFromHome;
use crate::utils::flash::Flash;
use crate::utils::page::{render, render_invalid};

#[utoipa::path(
    get,
    path = "/work-from-home",
    responses(
        (status = 200, description = "Blank work-from-home request form", body = Object, example = json!({
            "page": "work_from_home",
            "messages": [],
            "form": {"date": null, "start_time": null, "end_time": null}
        }))
    ),
    tag = "Work From Home"
)]
pub async fn work_from_home_form(_auth: Authorized<RequestWfh>, flash: Flash) -> HttpResponse {
    render(
        flash,
        "work_from_home",
        json!({ "form": WorkFromHomeForm::default() }),
    )
}

#[utoipa::path(
    post,
    path = "/work-from-home",
    request_body(
        content = WorkFromHomeForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Request submitted as pending; redirected to /work-from-home-history"),
        (status = 422, description = "Form rejected; nothing stored", body = Object)
    ),
    tag = "Work From Home"
)]
pub async fn work_from_home(
    auth: Authorized<RequestWfh>,
    pool: web::Data<SqlitePool>,
    form: web::Form<WorkFromHomeForm>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;

    let request = match form.clean() {
        Ok(request) => request,
        Err(errors) => {
            return Ok(render_invalid(
                flash,
                "work_from_home",
                json!({ "form": &*form }),
                &errors,
            ));
        }
    };

    let wfh_id = WorkFromHome::insert(pool.get_ref(), employee.id, &request)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = employee.id, "Failed to create work-from-home request");
            e
        })?;

    info!(wfh_id, employee_id = employee.id, date = %request.date, "Work-from-home request submitted");
    flash.success("Work From Home request submitted.");
    Ok(flash.redirect("/work-from-home-history"))
}

#[utoipa::path(
    get,
    path = "/work-from-home-history",
    responses(
        (status = 200, description = "Own work-from-home requests, newest date first", body = Object, example = json!({
            "page": "work_from_home_history",
            "messages": [],
            "wfh_requests": [{
                "id": 4, "employee_id": 7, "date": "2024-02-01",
                "start_time": "09:00:00", "end_time": "17:00:00", "status": "pending"
            }]
        }))
    ),
    tag = "Work From Home"
)]
pub async fn work_from_home_history(
    auth: Authorized<WfhHistory>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;
    let requests = WorkFromHome::list_for_employee(pool.get_ref(), employee.id).await?;

    Ok(render(
        flash,
        "work_from_home_history",
        json!({ "wfh_requests": requests }),
    ))
}

#[utoipa::path(
    get,
    path = "/manage-work-from-home",
    responses(
        (status = 200, description = "Every work-from-home request with its owner, newest date first", body = Object)
    ),
    tag = "Work From Home"
)]
pub async fn manage_work_from_home(
    auth: Authorized<ReviewWfh>,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let requests = WorkFromHome::list_all(pool.get_ref()).await?;

    Ok(render(
        flash,
        "manage_work_from_home",
        json!({ "wfh_requests": requests, "back_url": back_url(auth.role) }),
    ))
}

#[utoipa::path(
    post,
    path = "/approve-wfh/{wfh_id}",
    params(
        ("wfh_id" = i64, Path, description = "ID of the work-from-home request to approve")
    ),
    responses(
        (status = 303, description = "Approved and attendance marked as wfh for that day; redirected to /manage-work-from-home"),
        (status = 404, description = "Work-from-home request not found", body = Object, example = json!({
            "message": "Work-from-home request not found"
        }))
    ),
    tag = "Work From Home"
)]
pub async fn approve_wfh(
    auth: Authorized<ReviewWfh>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    review(&auth, pool.get_ref(), path.into_inner(), Decision::Approve, flash).await
}

#[utoipa::path(
    post,
    path = "/reject-wfh/{wfh_id}",
    params(
        ("wfh_id" = i64, Path, description = "ID of the work-from-home request to reject")
    ),
    responses(
        (status = 303, description = "Rejected; redirected to /manage-work-from-home"),
        (status = 404, description = "Work-from-home request not found", body = Object)
    ),
    tag = "Work From Home"
)]
pub async fn reject_wfh(
    auth: Authorized<ReviewWfh>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    review(&auth, pool.get_ref(), path.into_inner(), Decision::Reject, flash).await
}

async fn review(
    auth: &Authorized<ReviewWfh>,
    pool: &SqlitePool,
    wfh_id: i64,
    decision: Decision,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let request = WorkFromHome::find(pool, wfh_id)
        .await?
        .or_not_found("Work-from-home request")?;

    match request.status.transition(decision) {
        Transition::Apply(status) => {
            let applied = match decision {
                Decision::Approve => WorkFromHome::approve_if_pending(pool, wfh_id).await?,
                Decision::Reject => WorkFromHome::reject_if_pending(pool, wfh_id).await?,
            };

            if applied {
                info!(wfh_id, reviewer = auth.user_id, %status, "Work-from-home request reviewed");
                match decision {
                    Decision::Approve => {
                        flash.success("Work From Home approved and attendance marked.")
                    }
                    Decision::Reject => flash.warning("Work From Home rejected."),
                }
            } else {
                warn!(wfh_id, reviewer = auth.user_id, "Work-from-home request was reviewed concurrently");
                flash.warning("Work From Home request was already processed.");
            }
        }
        Transition::Unchanged => {
            warn!(wfh_id, reviewer = auth.user_id, status = %request.status, "Repeated review ignored");
            flash.info(format!("Work From Home request is already {}.", request.status));
        }
        Transition::Refused { current } => {
            warn!(wfh_id, reviewer = auth.user_id, %current, "Review of a closed work-from-home request refused");
            flash.warning(format!(
                "Work From Home request is already {current} and cannot be changed."
            ));
        }
    }

    Ok(flash.redirect("/manage-work-from-home"))
}
