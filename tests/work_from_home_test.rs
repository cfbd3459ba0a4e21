//! Work-from-home requests and the attendance written on approval.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{NaiveDate, NaiveTime};
use common::{TestContext, body_json, flash, location, messages};
use hr_portal::model::attendance::{Attendance, NewAttendance, WorkMode};
use hr_portal::model::role::Role;
use hr_portal::model::status::RequestStatus;
use hr_portal::model::work_from_home::{NewWorkFromHome, WorkFromHome};

fn feb_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}

async fn pending_wfh(ctx: &TestContext, employee_id: i64) -> i64 {
    let request = NewWorkFromHome {
        date: feb_first(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    };
    WorkFromHome::insert(&ctx.pool, employee_id, &request).await.unwrap()
}

#[actix_web::test]
async fn submitting_stores_a_pending_request() {
    let ctx = TestContext::new().await;
    let bob = ctx.seed_user("bob", Role::Employee).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/work-from-home")
        .cookie(ctx.session(bob, Role::Employee))
        .set_form([("date", "2024-02-01"), ("start_time", "09:00"), ("end_time", "17:00")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/work-from-home-history");

    let req = test::TestRequest::get()
        .uri("/work-from-home-history")
        .cookie(ctx.session(bob, Role::Employee))
        .cookie(flash(&resp))
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await;
    assert_eq!(messages(&page), ["Work From Home request submitted."]);
    assert_eq!(page["wfh_requests"][0]["status"], "pending");
    assert_eq!(page["wfh_requests"][0]["start_time"], "09:00:00");
}

#[actix_web::test]
async fn malformed_times_are_field_errors() {
    let ctx = TestContext::new().await;
    let bob = ctx.seed_user("bob", Role::Employee).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/work-from-home")
        .cookie(ctx.session(bob, Role::Employee))
        .set_form([("date", "2024-02-01"), ("start_time", "nine"), ("end_time", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let page = body_json(resp).await;
    assert_eq!(page["errors"]["start_time"][0], "Enter a valid time.");
    assert_eq!(page["errors"]["end_time"][0], "This field is required.");
    assert!(WorkFromHome::list_for_employee(&ctx.pool, bob).await.unwrap().is_empty());
}

#[actix_web::test]
async fn approval_marks_the_day_as_worked_from_home() {
    let ctx = TestContext::new().await;
    let bob = ctx.seed_user("bob", Role::Employee).await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let wfh = pending_wfh(&ctx, bob).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/approve-wfh/{wfh}"))
        .cookie(ctx.session(hannah, Role::Hr))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/manage-work-from-home");

    let stored = WorkFromHome::find(&ctx.pool, wfh).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);

    let attendance = Attendance::find_for(&ctx.pool, bob, feb_first())
        .await
        .unwrap()
        .expect("attendance row");
    assert_eq!(attendance.work_mode, WorkMode::Wfh);
    assert_eq!(attendance.check_in, None);
}

#[actix_web::test]
async fn approval_overwrites_an_existing_office_row() {
    let ctx = TestContext::new().await;
    let bob = ctx.seed_user("bob", Role::Employee).await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let office = NewAttendance {
        work_mode: WorkMode::Office,
        check_in: NaiveTime::from_hms_opt(9, 15, 0),
        check_out: None,
    };
    let existing = Attendance::insert(&ctx.pool, bob, feb_first(), &office).await.unwrap();
    let wfh = pending_wfh(&ctx, bob).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/approve-wfh/{wfh}"))
        .cookie(ctx.session(hannah, Role::Hr))
        .to_request();
    test::call_service(&app, req).await;

    let attendance = Attendance::find_for(&ctx.pool, bob, feb_first()).await.unwrap().unwrap();
    assert_eq!(attendance.id, existing);
    assert_eq!(attendance.work_mode, WorkMode::Wfh);
    assert_eq!(attendance.check_in, NaiveTime::from_hms_opt(9, 15, 0));
}

#[actix_web::test]
async fn rejection_leaves_attendance_untouched() {
    let ctx = TestContext::new().await;
    let bob = ctx.seed_user("bob", Role::Employee).await;
    let root = ctx.seed_user("root", Role::Admin).await;
    let wfh = pending_wfh(&ctx, bob).await;
    let app = test::init_service(ctx.app()).await;

    for action in ["reject", "approve"] {
        let req = test::TestRequest::post()
            .uri(&format!("/{action}-wfh/{wfh}"))
            .cookie(ctx.session(root, Role::Admin))
            .to_request();
        test::call_service(&app, req).await;
    }

    let stored = WorkFromHome::find(&ctx.pool, wfh).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Rejected);
    assert!(Attendance::find_for(&ctx.pool, bob, feb_first()).await.unwrap().is_none());
}

#[actix_web::test]
async fn second_approval_is_a_no_op() {
    let ctx = TestContext::new().await;
    let bob = ctx.seed_user("bob", Role::Employee).await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let wfh = pending_wfh(&ctx, bob).await;
    let app = test::init_service(ctx.app()).await;

    let approve = || {
        test::TestRequest::post()
            .uri(&format!("/approve-wfh/{wfh}"))
            .cookie(ctx.session(hannah, Role::Hr))
            .to_request()
    };
    test::call_service(&app, approve()).await;
    let resp = test::call_service(&app, approve()).await;

    let req = test::TestRequest::get()
        .uri("/manage-work-from-home")
        .cookie(ctx.session(hannah, Role::Hr))
        .cookie(flash(&resp))
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await;
    assert_eq!(messages(&page), ["Work From Home request is already approved."]);
    assert_eq!(page["wfh_requests"][0]["employee"], "bob");
    assert_eq!(page["back_url"], "/hr-home");

    let rows = Attendance::list_for_employee_between(&ctx.pool, bob, feb_first(), feb_first())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[actix_web::test]
async fn reviewing_a_missing_request_is_not_found() {
    let ctx = TestContext::new().await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/reject-wfh/42")
        .cookie(ctx.session(hannah, Role::Hr))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
