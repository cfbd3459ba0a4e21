use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FormErrors, blank_as_none, check, date_field, time_field};
use crate::model::work_from_home::NewWorkFromHome;

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct WorkFromHomeForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "2024-02-01", format = "date")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "09:00")]
    pub start_time: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "17:00")]
    pub end_time: Option<String>,
}

impl WorkFromHomeForm {
    pub fn clean(&self) -> Result<NewWorkFromHome, FormErrors> {
        let mut errors = check(self);

        let date = date_field(&mut errors, "date", self.date.as_deref());
        let start_time = time_field(&mut errors, "start_time", self.start_time.as_deref());
        let end_time = time_field(&mut errors, "end_time", self.end_time.as_deref());

        match (date, start_time, end_time) {
            (Some(date), Some(start_time), Some(end_time)) if errors.is_empty() => {
                Ok(NewWorkFromHome {
                    date,
                    start_time,
                    end_time,
                })
            }
            _ => Err(errors),
        }
    }
}
