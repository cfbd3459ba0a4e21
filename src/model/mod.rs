pub mod attendance;
pub mod department;
pub mod holiday;
pub mod leave_balance;
pub mod leave_request;
pub mod role;
pub mod status;
pub mod user;
pub mod work_from_home;
