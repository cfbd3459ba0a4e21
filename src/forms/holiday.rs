use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FormErrors, blank_as_none, check, date_field};
use crate::model::holiday::Holiday;

pub const DUPLICATE_DATE: &str = "Holiday with this Date already exists.";

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct HolidayForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required, length(max = 100))]
    #[schema(example = "New Year's Day")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required)]
    #[schema(example = "2027-01-01", format = "date")]
    pub date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidHoliday {
    pub name: String,
    pub date: NaiveDate,
}

impl HolidayForm {
    pub fn clean(&self) -> Result<ValidHoliday, FormErrors> {
        let mut errors = check(self);
        let date = date_field(&mut errors, "date", self.date.as_deref());

        match (&self.name, date) {
            (Some(name), Some(date)) if errors.is_empty() => Ok(ValidHoliday {
                name: name.clone(),
                date,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&Holiday> for HolidayForm {
    fn from(holiday: &Holiday) -> Self {
        Self {
            name: Some(holiday.name.clone()),
            date: Some(holiday.date.format("%Y-%m-%d").to_string()),
        }
    }
}
