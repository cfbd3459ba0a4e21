use actix_web::{HttpResponse, web};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use strum::IntoEnumIterator;
use tracing::{error, info};
use utoipa::IntoParams;

use crate::auth::auth::Authorized;
use crate::auth::gate::{AttendanceReport, MarkAttendance};
use crate::db::is_unique_violation;
use crate::error::{AppResult, OrNotFound};
use crate::forms::attendance::AttendanceForm;
use crate::forms::{FormErrors, NON_FIELD_ERRORS};
use crate::model::attendance::{Attendance, AttendanceRow, NewAttendance, WorkMode};
use crate::model::user::User;
use crate::utils::dates::{DateRange, month_bounds, resolve_range, today};
use crate::utils::flash::Flash;
use crate::utils::page::{render, render_invalid};

pub const ALREADY_MARKED: &str = "You have already marked attendance for today.";
pub const DUPLICATE_ATTENDANCE: &str = "Attendance with this Employee and Date already exists.";

fn form_page(form: &AttendanceForm) -> serde_json::Value {
    json!({
        "form": form,
        "work_modes": WorkMode::iter().collect::<Vec<_>>(),
        "date": today(),
    })
}

/* =========================
Self-service (employee)
========================= */
#[utoipa::path(
    get,
    path = "/mark-attendance",
    responses(
        (status = 200, description = "Attendance form for today", body = Object, example = json!({
            "page": "mark_attendance",
            "messages": [],
            "date": "2024-02-01",
            "form": {"work_mode": null, "check_in": null, "check_out": null},
            "work_modes": ["office", "wfh"]
        })),
        (status = 303, description = "Today is already marked; redirected to /employee-home with a warning")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance_form(
    auth: Authorized<MarkAttendance>,
    pool: web::Data<SqlitePool>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;

    if Attendance::exists_for(pool.get_ref(), employee.id, today()).await? {
        flash.warning(ALREADY_MARKED);
        return Ok(flash.redirect("/employee-home"));
    }

    Ok(render(flash, "mark_attendance", form_page(&AttendanceForm::default())))
}

#[utoipa::path(
    post,
    path = "/mark-attendance",
    request_body(
        content = AttendanceForm,
        description = "Work mode and optional check-in/check-out times; the date is always today",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Attendance stored, or today was already marked; redirected to /employee-home"),
        (status = 422, description = "Form rejected or a concurrent submission won; nothing stored", body = Object, example = json!({
            "page": "mark_attendance",
            "errors": {"__all__": ["Attendance with this Employee and Date already exists."]}
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: Authorized<MarkAttendance>,
    pool: web::Data<SqlitePool>,
    form: web::Form<AttendanceForm>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let employee = &auth.account;
    let date = today();

    if Attendance::exists_for(pool.get_ref(), employee.id, date).await? {
        flash.warning(ALREADY_MARKED);
        return Ok(flash.redirect("/employee-home"));
    }

    let record = match form.clean() {
        Ok(record) => record,
        Err(errors) => return Ok(render_invalid(flash, "mark_attendance", form_page(&form), &errors)),
    };

    match record_attendance(pool.get_ref(), employee.id, date, &record).await? {
        Ok(attendance_id) => {
            info!(attendance_id, employee_id = employee.id, %date, work_mode = %record.work_mode, "Attendance marked");
            flash.success("Attendance submitted successfully.");
            Ok(flash.redirect("/employee-home"))
        }
        Err(errors) => Ok(render_invalid(flash, "mark_attendance", form_page(&form), &errors)),
    }
}

/// Stores the day's record. Losing a race with another submission for the
/// same day comes back as a form-wide error and leaves the first row intact.
pub async fn record_attendance(
    pool: &SqlitePool,
    employee_id: i64,
    date: NaiveDate,
    record: &NewAttendance,
) -> AppResult<Result<i64, FormErrors>> {
    match Attendance::insert(pool, employee_id, date, record).await {
        Ok(attendance_id) => Ok(Ok(attendance_id)),
        Err(e) if is_unique_violation(&e) => {
            info!(employee_id, %date, "Duplicate attendance rejected");
            Ok(Err(FormErrors::single(NON_FIELD_ERRORS, DUPLICATE_ATTENDANCE)))
        }
        Err(e) => {
            error!(error = %e, employee_id, "Failed to mark attendance");
            Err(e.into())
        }
    }
}

/* =========================
Reports (HR)
========================= */
#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceRangeQuery {
    /// First day, `YYYY-MM-DD`; defaults to today
    pub start_date: Option<String>,
    /// Last day (inclusive), `YYYY-MM-DD`; defaults to today
    pub end_date: Option<String>,
}

#[utoipa::path(
    get,
    path = "/attendance",
    params(AttendanceRangeQuery),
    responses(
        (status = 200, description = "Attendance within the inclusive range, oldest first. Malformed dates give an empty list.", body = Object, example = json!({
            "page": "attendance",
            "messages": [],
            "start_date": "2024-02-01",
            "end_date": "2024-02-01",
            "records": [{
                "id": 12, "employee_id": 7, "employee": "bob", "date": "2024-02-01",
                "check_in": null, "check_out": null, "work_mode": "wfh"
            }]
        }))
    ),
    tag = "Attendance"
)]
pub async fn attendance_view(
    _auth: Authorized<AttendanceReport>,
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceRangeQuery>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let today = today();
    let range = resolve_range(query.start_date.as_deref(), query.end_date.as_deref(), today);

    let (records, start_date, end_date): (Vec<AttendanceRow>, String, String) = match range {
        DateRange::Between(start, end) => (
            Attendance::list_between(pool.get_ref(), start, end).await?,
            start.to_string(),
            end.to_string(),
        ),
        DateRange::Invalid => (
            Vec::new(),
            query.start_date.clone().unwrap_or_default(),
            query.end_date.clone().unwrap_or_default(),
        ),
    };

    Ok(render(
        flash,
        "attendance",
        json!({
            "records": records,
            "start_date": start_date,
            "end_date": end_date,
        }),
    ))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// 1-12; defaults to the current month
    pub month: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/attendance/{employee_id}/month",
    params(
        ("employee_id" = i64, Path, description = "Account whose attendance is listed"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "The employee's attendance for one calendar month, oldest first", body = Object, example = json!({
            "page": "employee_monthly_attendance",
            "messages": [],
            "employee": {"id": 7, "username": "bob", "email": null, "role": "employee",
                         "department_id": null, "department": null, "employee_code": null},
            "month": "February",
            "year": 2024,
            "records": []
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn employee_monthly_attendance(
    _auth: Authorized<AttendanceReport>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    query: web::Query<MonthQuery>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let employee_id = path.into_inner();
    let employee = User::find(pool.get_ref(), employee_id)
        .await?
        .or_not_found("Employee")?;

    let today = today();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());

    let (records, month_name) = match month_bounds(year, month) {
        Some((first, last)) => (
            Attendance::list_for_employee_between(pool.get_ref(), employee_id, first, last).await?,
            first.format("%B").to_string(),
        ),
        None => (Vec::new(), String::new()),
    };

    Ok(render(
        flash,
        "employee_monthly_attendance",
        json!({
            "employee": employee.summary(),
            "records": records,
            "month": month_name,
            "year": year,
        }),
    ))
}
