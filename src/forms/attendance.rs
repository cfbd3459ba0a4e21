use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FormErrors, blank_as_none, check, choice, time_field};
use crate::model::attendance::{NewAttendance, WorkMode};

/// Self-service attendance. The date is never part of the form.
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct AttendanceForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "office")]
    pub work_mode: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(example = "09:00")]
    pub check_in: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(example = "17:30")]
    pub check_out: Option<String>,
}

impl AttendanceForm {
    pub fn clean(&self) -> Result<NewAttendance, FormErrors> {
        let mut errors = check(self);

        let work_mode = choice::<WorkMode>(&mut errors, "work_mode", self.work_mode.as_deref());
        let check_in = time_field(&mut errors, "check_in", self.check_in.as_deref());
        let check_out = time_field(&mut errors, "check_out", self.check_out.as_deref());

        match work_mode {
            Some(work_mode) if errors.is_empty() => Ok(NewAttendance {
                work_mode,
                check_in,
                check_out,
            }),
            _ => Err(errors),
        }
    }
}
