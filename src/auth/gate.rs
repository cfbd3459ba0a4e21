//! Who may do what. Each capability lists its allowed roles exactly once;
//! handlers name the capability they need through `Authorized<C>`.

use crate::model::role::Role;

pub trait Capability: 'static {
    const NAME: &'static str;
    const ROLES: &'static [Role];

    fn permits(role: Role) -> bool {
        Self::ROLES.contains(&role)
    }
}

macro_rules! capabilities {
    ($($(#[$meta:meta])* $name:ident => [$($role:ident),+ $(,)?];)+) => {
        $(
            $(#[$meta])*
            pub struct $name;

            impl Capability for $name {
                const NAME: &'static str = stringify!($name);
                const ROLES: &'static [Role] = &[$(Role::$role),+];
            }
        )+

        pub const CAPABILITY_TABLE: &[(&str, &[Role])] = &[
            $((stringify!($name), &[$(Role::$role),+])),+
        ];
    };
}

capabilities! {
    AdminHome => [Admin];
    /// Create hr or admin accounts
    AddHr => [Admin];
    AllEmployees => [Admin];
    AllLeaves => [Admin];
    DeleteEmployee => [Admin];
    ManageHolidays => [Admin];

    HrHome => [Hr];
    /// Create employee accounts
    AddEmployee => [Hr];
    EmployeeList => [Hr];
    AttendanceReport => [Hr];

    EmployeeHome => [Employee];
    ApplyLeave => [Employee];
    LeaveHistory => [Employee];
    RequestWfh => [Employee];
    WfhHistory => [Employee];
    MarkAttendance => [Employee];

    /// List, approve and reject leave requests
    ReviewLeaves => [Hr, Admin];
    /// List, approve and reject work-from-home requests
    ReviewWfh => [Hr, Admin];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviewers_are_hr_and_admin() {
        assert!(ReviewLeaves::permits(Role::Hr));
        assert!(ReviewLeaves::permits(Role::Admin));
        assert!(!ReviewLeaves::permits(Role::Employee));
        assert!(ReviewWfh::permits(Role::Hr));
        assert!(!ReviewWfh::permits(Role::Employee));
    }

    #[test]
    fn only_employees_mark_attendance() {
        assert!(MarkAttendance::permits(Role::Employee));
        assert!(!MarkAttendance::permits(Role::Hr));
        assert!(!MarkAttendance::permits(Role::Admin));
    }

    #[test]
    fn account_management_is_split_between_admin_and_hr() {
        assert_eq!(AddHr::ROLES, &[Role::Admin]);
        assert_eq!(AddEmployee::ROLES, &[Role::Hr]);
        assert_eq!(DeleteEmployee::ROLES, &[Role::Admin]);
    }

    #[test]
    fn every_capability_allows_someone() {
        for (name, roles) in CAPABILITY_TABLE {
            assert!(!roles.is_empty(), "{name} allows no role");
        }
        assert_eq!(CAPABILITY_TABLE.len(), 18);
    }
}
