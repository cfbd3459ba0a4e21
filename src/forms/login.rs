use serde::Deserialize;
use utoipa::ToSchema;

use crate::forms::blank_as_none;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[serde(default)]
    #[schema(example = "password", format = "password")]
    pub password: Option<String>,
}

impl LoginForm {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !password.is_empty() => Some((username, password)),
            _ => None,
        }
    }
}
