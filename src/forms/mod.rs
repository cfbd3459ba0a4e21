//! Submitted forms. Each form is a bag of optional raw strings that is checked
//! field by field and turned into a typed value, or into `FormErrors` that
//! the handler renders back next to the submitted data.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod login;
pub mod work_from_home;

/// Key for errors that belong to the form as a whole.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED: &str = "This field is required.";

/// Field name to messages, keyed in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(example = json!({"date": ["Holiday with this Date already exists."]}))]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = match &*error.code {
                    "required" => REQUIRED.to_string(),
                    "email" => "Enter a valid email address.".to_string(),
                    "length" => match (error.params.get("max"), error.params.get("min")) {
                        (Some(max), _) => {
                            format!("Ensure this value has at most {max} characters.")
                        }
                        (None, Some(min)) => {
                            format!("Ensure this value has at least {min} characters.")
                        }
                        (None, None) => "Invalid length.".to_string(),
                    },
                    code => error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| code.to_string()),
                };
                out.add(field, message);
            }
        }
        out
    }
}

/// Runs the derived checks of a form, collecting their messages.
pub fn check<T: validator::Validate>(form: &T) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(e) => e.into(),
    }
}

/// Browsers submit empty inputs as empty strings; treat those as missing.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Like `blank_as_none`, but keeps surrounding spaces: they are part of a
/// password.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Parses one of a closed set of values. Missing values are left to the
/// `required` check; anything outside the set is a field error.
pub fn choice<T: FromStr>(errors: &mut FormErrors, field: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, invalid_choice(raw));
            None
        }
    }
}

pub fn invalid_choice(value: impl Display) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

pub fn date_field(
    errors: &mut FormErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<chrono::NaiveDate> {
    let raw = raw?;
    let parsed = crate::utils::dates::parse_date(raw);
    if parsed.is_none() {
        errors.add(field, "Enter a valid date.");
    }
    parsed
}

pub fn time_field(
    errors: &mut FormErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<chrono::NaiveTime> {
    let raw = raw?;
    let parsed = crate::utils::dates::parse_time(raw);
    if parsed.is_none() {
        errors.add(field, "Enter a valid time.");
    }
    parsed
}
