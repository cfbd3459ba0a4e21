use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FormErrors, blank_as_none, check, choice, empty_as_none, invalid_choice};
use crate::model::role::Role;

/// Account creation form shared by HR (employees) and admins (HR, admins).
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct EmployeeForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 100))]
    #[schema(example = "alice")]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing)]
    #[validate(required, length(max = 100))]
    #[schema(example = "changeme", format = "password")]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email)]
    #[schema(example = "alice@company.com")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "employee")]
    pub role: Option<String>,

    /// Department id
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(example = "1")]
    pub department: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 10))]
    #[schema(example = "EMP001")]
    pub employee_code: Option<String>,
}

/// A submission that passed every check; the password is still plaintext.
#[derive(Debug, Clone)]
pub struct ValidEmployee {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub role: Role,
    pub department_id: Option<i64>,
    pub employee_code: Option<String>,
}

impl EmployeeForm {
    /// `allowed` is the subset of roles the caller may hand out;
    /// `outside_allowed` is the message for a valid role outside it.
    pub fn clean(
        &self,
        allowed: &[Role],
        outside_allowed: &str,
    ) -> Result<ValidEmployee, FormErrors> {
        let mut errors = check(self);

        let role = choice::<Role>(&mut errors, "role", self.role.as_deref());
        if let Some(role) = role {
            if !allowed.contains(&role) {
                errors.add("role", outside_allowed);
            }
        }

        let department_id = match self.department.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("department", invalid_choice(raw));
                    None
                }
            },
        };

        match (&self.username, &self.password, role) {
            (Some(username), Some(password), Some(role)) if errors.is_empty() => {
                Ok(ValidEmployee {
                    username: username.clone(),
                    password: password.clone(),
                    email: self.email.clone(),
                    role,
                    department_id,
                    employee_code: self.employee_code.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONLY_EMPLOYEES: &str = "You are only allowed to add employees.";

    fn form(role: &str) -> EmployeeForm {
        EmployeeForm {
            username: Some("alice".into()),
            password: Some("pw".into()),
            email: Some("alice@company.com".into()),
            role: Some(role.into()),
            department: None,
            employee_code: Some("EMP001".into()),
        }
    }

    #[test]
    fn accepts_a_role_inside_the_allowed_subset() {
        let valid = form("employee")
            .clean(&[Role::Employee], ONLY_EMPLOYEES)
            .unwrap();
        assert_eq!(valid.role, Role::Employee);
        assert_eq!(valid.employee_code.as_deref(), Some("EMP001"));
    }

    #[test]
    fn role_outside_the_subset_is_a_role_error() {
        let errors = form("admin")
            .clean(&[Role::Employee], ONLY_EMPLOYEES)
            .unwrap_err();
        assert_eq!(errors.get("role"), [ONLY_EMPLOYEES.to_string()]);
    }

    #[test]
    fn required_fields_and_formats_are_checked() {
        let bad = EmployeeForm {
            username: None,
            password: None,
            email: Some("not-an-email".into()),
            role: None,
            department: Some("sales".into()),
            employee_code: Some("EMP-0000000001".into()),
        };
        let errors = bad.clean(&[Role::Hr, Role::Admin], "x").unwrap_err();
        for field in ["username", "password", "email", "role", "department", "employee_code"] {
            assert!(errors.has(field), "expected an error on {field}");
        }
    }
}
