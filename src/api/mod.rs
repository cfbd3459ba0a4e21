use crate::model::role::Role;

pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod work_from_home;

/// Where the "back" link of a shared review page points.
pub(crate) fn back_url(role: Role) -> &'static str {
    role.home_path()
}
