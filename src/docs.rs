use utoipa::OpenApi;

use crate::api::employee::DeleteEmployeeForm;
use crate::forms::FormErrors;
use crate::forms::attendance::AttendanceForm;
use crate::forms::employee::EmployeeForm;
use crate::forms::holiday::HolidayForm;
use crate::forms::leave_request::LeaveRequestForm;
use crate::forms::login::LoginForm;
use crate::forms::work_from_home::WorkFromHomeForm;
use crate::model::attendance::{Attendance, AttendanceRow, WorkMode};
use crate::model::department::Department;
use crate::model::holiday::Holiday;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::{LeaveRequest, LeaveRequestRow, LeaveType};
use crate::model::role::Role;
use crate::model::status::RequestStatus;
use crate::model::user::UserSummary;
use crate::model::work_from_home::{WorkFromHome, WorkFromHomeRow};
use crate::utils::flash::{FlashMessage, Level};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal",
        version = "1.0.0",
        description = r#"
## HR Portal

Role-based record keeping for leave, work-from-home, attendance and the
employee roster.

### Roles
- **admin**: adds HR staff and admins, deletes accounts, maintains the holiday calendar
- **hr**: adds employees, reviews requests, reads attendance reports
- **employee**: applies for leave and work-from-home, marks daily attendance

### Sessions
Logging in sets the `hr_session` cookie. Every other page checks the session
role first; a missing session or a role outside the page's set is redirected
to `/login`.

### Pages
Each page answers with a JSON view model: `page`, the one-shot `messages`
queued by the previous action, and the page's data. Rejected forms answer
`422` with field-level `errors`; successful submissions answer `303`.
"#,
    ),
    paths(
        crate::auth::handlers::login_form,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::dashboard::admin_home,
        crate::api::dashboard::hr_home,
        crate::api::dashboard::employee_home,

        crate::api::leave_request::apply_leave_form,
        crate::api::leave_request::apply_leave,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::manage_leaves,
        crate::api::leave_request::all_leaves,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::work_from_home::work_from_home_form,
        crate::api::work_from_home::work_from_home,
        crate::api::work_from_home::work_from_home_history,
        crate::api::work_from_home::manage_work_from_home,
        crate::api::work_from_home::approve_wfh,
        crate::api::work_from_home::reject_wfh,

        crate::api::attendance::mark_attendance_form,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_view,
        crate::api::attendance::employee_monthly_attendance,

        crate::api::employee::add_employee_form,
        crate::api::employee::add_employee,
        crate::api::employee::add_hr_form,
        crate::api::employee::add_hr,
        crate::api::employee::employee_list,
        crate::api::employee::all_employees,
        crate::api::employee::delete_employee_form,
        crate::api::employee::delete_employee,

        crate::api::holiday::upcoming_holidays,
        crate::api::holiday::manage_holidays_form,
        crate::api::holiday::manage_holidays,
        crate::api::holiday::edit_holiday_form,
        crate::api::holiday::edit_holiday,
        crate::api::holiday::delete_holiday
    ),
    components(
        schemas(
            LoginForm,
            EmployeeForm,
            DeleteEmployeeForm,
            LeaveRequestForm,
            WorkFromHomeForm,
            AttendanceForm,
            HolidayForm,
            FormErrors,
            FlashMessage,
            Level,
            Role,
            LeaveType,
            RequestStatus,
            WorkMode,
            UserSummary,
            Department,
            LeaveRequest,
            LeaveRequestRow,
            LeaveBalance,
            WorkFromHome,
            WorkFromHomeRow,
            Attendance,
            AttendanceRow,
            Holiday
        )
    ),
    tags(
        (name = "Auth", description = "Login and logout"),
        (name = "Dashboard", description = "Role landing pages and leave balance"),
        (name = "Leave", description = "Leave requests and their review"),
        (name = "Work From Home", description = "Work-from-home requests and their review"),
        (name = "Attendance", description = "Daily attendance and reports"),
        (name = "Roster", description = "Accounts and departments"),
        (name = "Holiday", description = "Holiday calendar"),
    )
)]
pub struct ApiDoc;
