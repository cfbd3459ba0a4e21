use actix_web::web;

use crate::api::{attendance, dashboard, employee, holiday, leave_request, work_from_home};
use crate::auth::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Public
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(
            web::resource("/login")
                .route(web::get().to(handlers::login_form))
                .route(web::post().to(handlers::login)),
        )
        // logout answers any method
        .service(web::resource("/logout").to(handlers::logout))
        .service(web::resource("/holidays").route(web::get().to(holiday::upcoming_holidays)));

    // Landing pages
    cfg.service(web::resource("/admin-home").route(web::get().to(dashboard::admin_home)))
        .service(web::resource("/hr-home").route(web::get().to(dashboard::hr_home)))
        .service(web::resource("/employee-home").route(web::get().to(dashboard::employee_home)));

    // Leave
    cfg.service(
        web::resource("/apply-leave")
            .route(web::get().to(leave_request::apply_leave_form))
            .route(web::post().to(leave_request::apply_leave)),
    )
    .service(web::resource("/leave-history").route(web::get().to(leave_request::leave_history)))
    .service(web::resource("/manage-leaves").route(web::get().to(leave_request::manage_leaves)))
    .service(web::resource("/all-leaves").route(web::get().to(leave_request::all_leaves)))
    .service(
        web::resource("/approve-leave/{leave_id}")
            .route(web::post().to(leave_request::approve_leave)),
    )
    .service(
        web::resource("/reject-leave/{leave_id}").route(web::post().to(leave_request::reject_leave)),
    );

    // Work from home
    cfg.service(
        web::resource("/work-from-home")
            .route(web::get().to(work_from_home::work_from_home_form))
            .route(web::post().to(work_from_home::work_from_home)),
    )
    .service(
        web::resource("/work-from-home-history")
            .route(web::get().to(work_from_home::work_from_home_history)),
    )
    .service(
        web::resource("/manage-work-from-home")
            .route(web::get().to(work_from_home::manage_work_from_home)),
    )
    .service(web::resource("/approve-wfh/{wfh_id}").route(web::post().to(work_from_home::approve_wfh)))
    .service(web::resource("/reject-wfh/{wfh_id}").route(web::post().to(work_from_home::reject_wfh)));

    // Attendance
    cfg.service(
        web::resource("/mark-attendance")
            .route(web::get().to(attendance::mark_attendance_form))
            .route(web::post().to(attendance::mark_attendance)),
    )
    .service(web::resource("/attendance").route(web::get().to(attendance::attendance_view)))
    .service(
        web::resource("/attendance/{employee_id}/month")
            .route(web::get().to(attendance::employee_monthly_attendance)),
    );

    // Roster
    cfg.service(
        web::resource("/add-employee")
            .route(web::get().to(employee::add_employee_form))
            .route(web::post().to(employee::add_employee)),
    )
    .service(
        web::resource("/add-hr")
            .route(web::get().to(employee::add_hr_form))
            .route(web::post().to(employee::add_hr)),
    )
    .service(web::resource("/employee-list").route(web::get().to(employee::employee_list)))
    .service(web::resource("/all-employees").route(web::get().to(employee::all_employees)))
    .service(
        web::resource("/delete-employee")
            .route(web::get().to(employee::delete_employee_form))
            .route(web::post().to(employee::delete_employee)),
    );

    // Holidays
    cfg.service(
        web::resource("/manage-holidays")
            .route(web::get().to(holiday::manage_holidays_form))
            .route(web::post().to(holiday::manage_holidays)),
    )
    .service(
        web::resource("/edit-holiday/{holiday_id}")
            .route(web::get().to(holiday::edit_holiday_form))
            .route(web::post().to(holiday::edit_holiday)),
    )
    .service(
        web::resource("/delete-holiday/{holiday_id}").route(web::post().to(holiday::delete_holiday)),
    );
}
