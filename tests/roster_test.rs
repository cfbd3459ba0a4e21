//! Account creation, listings and deletion.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::NaiveDate;
use common::{PASSWORD, TestContext, body_json, flash, location, messages};
use hr_portal::auth::password::verify_password;
use hr_portal::model::attendance::{Attendance, NewAttendance, WorkMode};
use hr_portal::model::department::Department;
use hr_portal::model::leave_request::{LeaveRequest, LeaveType, NewLeaveRequest};
use hr_portal::model::role::Role;
use hr_portal::model::user::User;

fn employee_form<'a>(username: &'a str, role: &'a str, code: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("username", username),
        ("password", PASSWORD),
        ("email", "new@company.com"),
        ("role", role),
        ("employee_code", code),
    ]
}

#[actix_web::test]
async fn hr_adds_employees_with_hashed_passwords() {
    let ctx = TestContext::new().await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let engineering = Department::create(&ctx.pool, "Engineering").await.unwrap();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get()
        .uri("/add-employee")
        .cookie(ctx.session(hannah, Role::Hr))
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await;
    assert_eq!(page["allowed_roles"], serde_json::json!(["employee"]));
    assert_eq!(page["departments"][0]["name"], "Engineering");

    let department = engineering.to_string();
    let mut form = employee_form("carol", "employee", "EMP010");
    form.push(("department", department.as_str()));
    let req = test::TestRequest::post()
        .uri("/add-employee")
        .cookie(ctx.session(hannah, Role::Hr))
        .set_form(&form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/hr-home");

    let carol = User::find_by_username(&ctx.pool, "carol").await.unwrap().unwrap();
    assert_eq!(carol.role, Role::Employee);
    assert_eq!(carol.department_id, Some(engineering));
    assert_ne!(carol.password, PASSWORD);
    assert!(verify_password(PASSWORD, &carol.password));

    let req = test::TestRequest::get()
        .uri("/employee-list")
        .cookie(ctx.session(hannah, Role::Hr))
        .cookie(flash(&resp))
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await;
    assert_eq!(messages(&page), ["Employee created successfully."]);
    let employees = page["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0]["department"], "Engineering");
}

#[actix_web::test]
async fn hr_cannot_create_hr_or_admin() {
    let ctx = TestContext::new().await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let app = test::init_service(ctx.app()).await;

    for role in ["admin", "hr"] {
        let req = test::TestRequest::post()
            .uri("/add-employee")
            .cookie(ctx.session(hannah, Role::Hr))
            .set_form(employee_form("mallory", role, "EMP666"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let page = body_json(resp).await;
        assert_eq!(page["errors"]["role"][0], "You are only allowed to add employees.");
        assert!(page["form"].get("password").is_none());
    }
    assert!(User::find_by_username(&ctx.pool, "mallory").await.unwrap().is_none());
}

#[actix_web::test]
async fn admin_adds_hr_and_admins_only() {
    let ctx = TestContext::new().await;
    let root = ctx.seed_user("root", Role::Admin).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/add-hr")
        .cookie(ctx.session(root, Role::Admin))
        .set_form(employee_form("henry", "hr", "HR001"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/admin-home");
    assert_eq!(
        User::find_by_username(&ctx.pool, "henry").await.unwrap().unwrap().role,
        Role::Hr
    );

    let req = test::TestRequest::post()
        .uri("/add-hr")
        .cookie(ctx.session(root, Role::Admin))
        .set_form(employee_form("erin", "employee", "EMP002"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_json(resp).await;
    assert_eq!(page["errors"]["role"][0], "You can only add HR or Admins.");
}

#[actix_web::test]
async fn duplicate_codes_and_usernames_are_field_errors() {
    let ctx = TestContext::new().await;
    let root = ctx.seed_user("root", Role::Admin).await;
    let app = test::init_service(ctx.app()).await;
    let admin = ctx.session(root, Role::Admin);

    let add = |form: Vec<(&str, &str)>| {
        test::TestRequest::post()
            .uri("/add-hr")
            .cookie(admin.clone())
            .set_form(form)
            .to_request()
    };

    let resp = test::call_service(&app, add(employee_form("henry", "hr", "HR001"))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = test::call_service(&app, add(employee_form("harriet", "hr", "HR001"))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_json(resp).await;
    assert!(page["errors"]["employee_code"].is_array());

    let resp = test::call_service(&app, add(employee_form("henry", "admin", "HR002"))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_json(resp).await;
    assert!(page["errors"]["username"].is_array());

    let resp = test::call_service(&app, add(employee_form("hugo", "hr", "HR003"))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let mut unknown_department = employee_form("hazel", "hr", "HR004");
    unknown_department.push(("department", "999"));
    let resp = test::call_service(&app, add(unknown_department)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_json(resp).await;
    assert!(page["errors"]["department"].is_array());
}

#[actix_web::test]
async fn admin_listing_excludes_admins() {
    let ctx = TestContext::new().await;
    let root = ctx.seed_user("root", Role::Admin).await;
    ctx.seed_user("hannah", Role::Hr).await;
    ctx.seed_user("alice", Role::Employee).await;
    let app = test::init_service(ctx.app()).await;

    for uri in ["/all-employees", "/delete-employee"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(ctx.session(root, Role::Admin))
            .to_request();
        let page = body_json(test::call_service(&app, req).await).await;
        let names: Vec<&str> = page["employees"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["alice", "hannah"], "{uri}");
    }
}

#[actix_web::test]
async fn admin_accounts_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let root = ctx.seed_user("root", Role::Admin).await;
    let other_admin = ctx.seed_user("ada", Role::Admin).await;
    let app = test::init_service(ctx.app()).await;

    let target = other_admin.to_string();
    let req = test::TestRequest::post()
        .uri("/delete-employee")
        .cookie(ctx.session(root, Role::Admin))
        .set_form([("employee_id", target.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/delete-employee");
    assert!(User::find(&ctx.pool, other_admin).await.unwrap().is_some());

    let req = test::TestRequest::get()
        .uri("/delete-employee")
        .cookie(ctx.session(root, Role::Admin))
        .cookie(flash(&resp))
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await;
    assert_eq!(messages(&page), ["Admin accounts cannot be deleted."]);
}

#[actix_web::test]
async fn deleting_an_employee_removes_their_records() {
    let ctx = TestContext::new().await;
    let root = ctx.seed_user("root", Role::Admin).await;
    let alice = ctx.seed_user("alice", Role::Employee).await;
    let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let leave = NewLeaveRequest {
        leave_type: LeaveType::Casual,
        start_date: day,
        end_date: day,
        reason: "Errand".to_string(),
        attachment: None,
    };
    LeaveRequest::insert(&ctx.pool, alice, &leave).await.unwrap();
    let record = NewAttendance {
        work_mode: WorkMode::Office,
        check_in: None,
        check_out: None,
    };
    Attendance::insert(&ctx.pool, alice, day, &record).await.unwrap();
    let app = test::init_service(ctx.app()).await;

    let target = alice.to_string();
    let req = test::TestRequest::post()
        .uri("/delete-employee")
        .cookie(ctx.session(root, Role::Admin))
        .set_form([("employee_id", target.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert!(User::find(&ctx.pool, alice).await.unwrap().is_none());
    assert!(LeaveRequest::list_for_employee(&ctx.pool, alice).await.unwrap().is_empty());
    assert!(Attendance::find_for(&ctx.pool, alice, day).await.unwrap().is_none());

    // a second attempt finds nobody
    let req = test::TestRequest::post()
        .uri("/delete-employee")
        .cookie(ctx.session(root, Role::Admin))
        .set_form([("employee_id", target.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let req = test::TestRequest::get()
        .uri("/delete-employee")
        .cookie(ctx.session(root, Role::Admin))
        .cookie(flash(&resp))
        .to_request();
    let page = body_json(test::call_service(&app, req).await).await;
    assert_eq!(messages(&page), ["Employee not found."]);
}

#[actix_web::test]
async fn deleting_a_department_clears_the_reference() {
    let ctx = TestContext::new().await;
    let sales = Department::create(&ctx.pool, "Sales").await.unwrap();
    let alice = ctx.seed_user("alice", Role::Employee).await;
    sqlx::query("UPDATE users SET department_id = ? WHERE id = ?")
        .bind(sales)
        .bind(alice)
        .execute(&ctx.pool)
        .await
        .unwrap();

    assert_eq!(Department::delete(&ctx.pool, sales).await.unwrap(), 1);

    let alice = User::find(&ctx.pool, alice).await.unwrap().unwrap();
    assert_eq!(alice.department_id, None);
}

#[actix_web::test]
async fn passwords_keep_their_surrounding_spaces() {
    let ctx = TestContext::new().await;
    let hannah = ctx.seed_user("hannah", Role::Hr).await;
    let app = test::init_service(ctx.app()).await;

    let padded = "  spaced out  ";
    let req = test::TestRequest::post()
        .uri("/add-employee")
        .cookie(ctx.session(hannah, Role::Hr))
        .set_form([("username", "sam"), ("password", padded), ("role", "employee")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/hr-home");

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "sam"), ("password", padded)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/employee-home");

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "sam"), ("password", padded.trim())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
