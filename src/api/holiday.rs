use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info, warn};
use utoipa::IntoParams;

use crate::auth::auth::Authorized;
use crate::auth::gate::ManageHolidays;
use crate::db::is_unique_violation;
use crate::error::{AppError, AppResult, OrNotFound};
use crate::forms::FormErrors;
use crate::forms::holiday::{DUPLICATE_DATE, HolidayForm, ValidHoliday};
use crate::model::holiday::Holiday;
use crate::utils::dates::today;
use crate::utils::flash::Flash;
use crate::utils::page::{render, render_invalid};

#[utoipa::path(
    get,
    path = "/holidays",
    responses(
        (status = 200, description = "Holidays from today on, soonest first. No login required.", body = Object, example = json!({
            "page": "upcoming_holidays",
            "messages": [],
            "holidays": [{"id": 3, "name": "New Year's Day", "date": "2027-01-01"}]
        }))
    ),
    tag = "Holiday"
)]
pub async fn upcoming_holidays(
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let holidays = Holiday::list_from(pool.get_ref(), today()).await?;
    Ok(render(flash, "upcoming_holidays", json!({ "holidays": holidays })))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EditQuery {
    /// Holiday to pre-fill and update instead of creating a new one
    pub edit: Option<i64>,
}

async fn manage_page(
    pool: &SqlitePool,
    form: &HolidayForm,
    editing: Option<i64>,
) -> AppResult<serde_json::Value> {
    let holidays = Holiday::list_all(pool).await?;
    Ok(json!({
        "holidays": holidays,
        "form": form,
        "editing": editing,
    }))
}

/// Creates a holiday, or updates `id` when given. A date already taken by
/// another holiday comes back as a field error and nothing changes.
async fn save(
    pool: &SqlitePool,
    id: Option<i64>,
    holiday: &ValidHoliday,
) -> AppResult<Result<i64, FormErrors>> {
    let result = match id {
        None => Holiday::insert(pool, &holiday.name, holiday.date).await,
        Some(id) => match Holiday::update(pool, id, &holiday.name, holiday.date).await {
            Ok(0) => return Err(AppError::NotFound("Holiday")),
            Ok(_) => Ok(id),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(id) => Ok(Ok(id)),
        Err(e) if is_unique_violation(&e) => {
            info!(date = %holiday.date, "Duplicate holiday date rejected");
            Ok(Err(FormErrors::single("date", DUPLICATE_DATE)))
        }
        Err(e) => {
            error!(error = %e, date = %holiday.date, "Failed to save holiday");
            Err(e.into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/manage-holidays",
    params(EditQuery),
    responses(
        (status = 200, description = "Every holiday, soonest first, with a blank or pre-filled form", body = Object, example = json!({
            "page": "manage_holidays",
            "messages": [],
            "holidays": [{"id": 3, "name": "New Year's Day", "date": "2027-01-01"}],
            "form": {"name": null, "date": null},
            "editing": null
        })),
        (status = 404, description = "The holiday named by `edit` does not exist", body = Object)
    ),
    tag = "Holiday"
)]
pub async fn manage_holidays_form(
    _auth: Authorized<ManageHolidays>,
    pool: web::Data<SqlitePool>,
    query: web::Query<EditQuery>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let form = match query.edit {
        Some(id) => {
            let holiday = Holiday::find(pool.get_ref(), id).await?.or_not_found("Holiday")?;
            HolidayForm::from(&holiday)
        }
        None => HolidayForm::default(),
    };

    let body = manage_page(pool.get_ref(), &form, query.edit).await?;
    Ok(render(flash, "manage_holidays", body))
}

#[utoipa::path(
    post,
    path = "/manage-holidays",
    params(EditQuery),
    request_body(
        content = HolidayForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Holiday stored; redirected to /manage-holidays"),
        (status = 422, description = "Form rejected or date already taken; nothing changed", body = Object, example = json!({
            "page": "manage_holidays",
            "errors": {"date": ["Holiday with this Date already exists."]}
        })),
        (status = 404, description = "The holiday named by `edit` does not exist", body = Object)
    ),
    tag = "Holiday"
)]
pub async fn manage_holidays(
    auth: Authorized<ManageHolidays>,
    pool: web::Data<SqlitePool>,
    query: web::Query<EditQuery>,
    form: web::Form<HolidayForm>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let errors = match form.clean() {
        Ok(holiday) => match save(pool.get_ref(), query.edit, &holiday).await? {
            Ok(holiday_id) => {
                info!(holiday_id, admin = auth.user_id, date = %holiday.date, "Holiday saved");
                match query.edit {
                    Some(_) => flash.success("Holiday updated successfully."),
                    None => flash.success("Holiday added successfully."),
                }
                return Ok(flash.redirect("/manage-holidays"));
            }
            Err(errors) => errors,
        },
        Err(errors) => errors,
    };

    let body = manage_page(pool.get_ref(), &form, query.edit).await?;
    Ok(render_invalid(flash, "manage_holidays", body, &errors))
}

#[utoipa::path(
    get,
    path = "/edit-holiday/{holiday_id}",
    params(
        ("holiday_id" = i64, Path, description = "ID of the holiday to edit")
    ),
    responses(
        (status = 200, description = "Form pre-filled with the holiday", body = Object, example = json!({
            "page": "edit_holiday",
            "messages": [],
            "holiday": {"id": 3, "name": "New Year's Day", "date": "2027-01-01"},
            "form": {"name": "New Year's Day", "date": "2027-01-01"}
        })),
        (status = 404, description = "Holiday not found", body = Object, example = json!({
            "message": "Holiday not found"
        }))
    ),
    tag = "Holiday"
)]
pub async fn edit_holiday_form(
    _auth: Authorized<ManageHolidays>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let holiday = Holiday::find(pool.get_ref(), path.into_inner())
        .await?
        .or_not_found("Holiday")?;

    Ok(render(
        flash,
        "edit_holiday",
        json!({ "form": HolidayForm::from(&holiday), "holiday": holiday }),
    ))
}

#[utoipa::path(
    post,
    path = "/edit-holiday/{holiday_id}",
    params(
        ("holiday_id" = i64, Path, description = "ID of the holiday to update")
    ),
    request_body(
        content = HolidayForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Holiday updated; redirected to /manage-holidays"),
        (status = 422, description = "Form rejected or date already taken; nothing changed", body = Object),
        (status = 404, description = "Holiday not found", body = Object)
    ),
    tag = "Holiday"
)]
pub async fn edit_holiday(
    auth: Authorized<ManageHolidays>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Form<HolidayForm>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let holiday_id = path.into_inner();
    let holiday = Holiday::find(pool.get_ref(), holiday_id)
        .await?
        .or_not_found("Holiday")?;

    let errors = match form.clean() {
        Ok(valid) => match save(pool.get_ref(), Some(holiday_id), &valid).await? {
            Ok(_) => {
                info!(holiday_id, admin = auth.user_id, date = %valid.date, "Holiday updated");
                flash.success("Holiday updated successfully.");
                return Ok(flash.redirect("/manage-holidays"));
            }
            Err(errors) => errors,
        },
        Err(errors) => errors,
    };

    Ok(render_invalid(
        flash,
        "edit_holiday",
        json!({ "form": &*form, "holiday": holiday }),
        &errors,
    ))
}

#[utoipa::path(
    post,
    path = "/delete-holiday/{holiday_id}",
    params(
        ("holiday_id" = i64, Path, description = "ID of the holiday to delete")
    ),
    responses(
        (status = 303, description = "Holiday removed (a missing id changes nothing); redirected to /manage-holidays")
    ),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: Authorized<ManageHolidays>,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    mut flash: Flash,
) -> AppResult<HttpResponse> {
    let holiday_id = path.into_inner();

    if Holiday::delete(pool.get_ref(), holiday_id).await? > 0 {
        info!(holiday_id, admin = auth.user_id, "Holiday deleted");
        flash.warning("Holiday deleted.");
    } else {
        warn!(holiday_id, admin = auth.user_id, "Delete of unknown holiday ignored");
    }

    Ok(flash.redirect("/manage-holidays"))
}
