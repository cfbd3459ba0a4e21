use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FormErrors, blank_as_none, check, choice, date_field};
use crate::model::leave_request::{LeaveType, NewLeaveRequest};

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct LeaveRequestForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "annual")]
    pub leave_type: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "2024-01-10", format = "date")]
    pub start_date: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "2024-01-12", format = "date")]
    pub end_date: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "Family trip")]
    pub reason: Option<String>,

    /// Path returned by the attachment store for an uploaded file
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255))]
    #[schema(example = "attachments/medical.pdf")]
    pub attachment: Option<String>,
}

impl LeaveRequestForm {
    pub fn clean(&self) -> Result<NewLeaveRequest, FormErrors> {
        let mut errors = check(self);

        let leave_type = choice::<LeaveType>(&mut errors, "leave_type", self.leave_type.as_deref());
        let start_date = date_field(&mut errors, "start_date", self.start_date.as_deref());
        let end_date = date_field(&mut errors, "end_date", self.end_date.as_deref());

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add("end_date", "End date cannot be before start date.");
            }
        }

        match (leave_type, start_date, end_date, &self.reason) {
            (Some(leave_type), Some(start_date), Some(end_date), Some(reason))
                if errors.is_empty() =>
            {
                Ok(NewLeaveRequest {
                    leave_type,
                    start_date,
                    end_date,
                    reason: reason.clone(),
                    attachment: self.attachment.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(leave_type: &str, start: &str, end: &str) -> LeaveRequestForm {
        LeaveRequestForm {
            leave_type: Some(leave_type.into()),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            reason: Some("Family trip".into()),
            attachment: None,
        }
    }

    #[test]
    fn valid_submission_becomes_a_new_request() {
        let leave = form("annual", "2024-01-10", "2024-01-12").clean().unwrap();
        assert_eq!(leave.leave_type, LeaveType::Annual);
        assert_eq!(leave.start_date.to_string(), "2024-01-10");
        assert!(leave.attachment.is_none());
    }

    #[test]
    fn unknown_leave_type_is_rejected() {
        let errors = form("unpaid", "2024-01-10", "2024-01-12").clean().unwrap_err();
        assert!(errors.has("leave_type"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let errors = form("sick", "2024-01-12", "2024-01-10").clean().unwrap_err();
        assert!(errors.has("end_date"));
        assert!(!errors.has("start_date"));
    }

    #[test]
    fn missing_reason_is_required() {
        let mut bad = form("casual", "2024-01-10", "2024-01-10");
        bad.reason = None;
        let errors = bad.clean().unwrap_err();
        assert_eq!(errors.get("reason"), [crate::forms::REQUIRED.to_string()]);
    }
}
