use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Review state shared by leave and work-from-home requests.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// What a reviewer asked for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(self) -> RequestStatus {
        match self {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transition {
    /// pending -> approved | rejected
    Apply(RequestStatus),
    /// The record already carries the requested status.
    Unchanged,
    /// approved and rejected are terminal.
    Refused { current: RequestStatus },
}

impl RequestStatus {
    pub fn transition(self, decision: Decision) -> Transition {
        let target = decision.target();
        match self {
            RequestStatus::Pending => Transition::Apply(target),
            current if current == target => Transition::Unchanged,
            current => Transition::Refused { current },
        }
    }
}
