use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::model::status::RequestStatus;

/// Days of leave granted per type per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    pub casual: i64,
    pub sick: i64,
    pub annual: i64,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            casual: 6,
            sick: 6,
            annual: 20,
        }
    }
}

impl LeavePolicy {
    pub fn allotment(&self, leave_type: LeaveType) -> i64 {
        match leave_type {
            LeaveType::Casual => self.casual,
            LeaveType::Sick => self.sick,
            LeaveType::Annual => self.annual,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = 20)]
    pub annual: i64,
    #[schema(example = 6)]
    pub sick: i64,
    #[schema(example = 6)]
    pub casual: i64,
}

/// Calendar days covered by a range, both ends included. Weekends and
/// holidays count. A reversed range covers nothing.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// Remaining days per type after subtracting every approved request.
/// Requests in any other state are ignored; a type never goes below zero.
pub fn remaining_leaves(policy: &LeavePolicy, requests: &[LeaveRequest]) -> LeaveBalance {
    let mut used = LeaveBalance::default();

    for leave in requests
        .iter()
        .filter(|l| l.status == RequestStatus::Approved)
    {
        let days = inclusive_days(leave.start_date, leave.end_date);
        match leave.leave_type {
            LeaveType::Annual => used.annual += days,
            LeaveType::Sick => used.sick += days,
            LeaveType::Casual => used.casual += days,
        }
    }

    LeaveBalance {
        annual: (policy.allotment(LeaveType::Annual) - used.annual).max(0),
        sick: (policy.allotment(LeaveType::Sick) - used.sick).max(0),
        casual: (policy.allotment(LeaveType::Casual) - used.casual).max(0),
    }
}
