use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::status::RequestStatus;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveType {
    Casual,
    Annual,
    Sick,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 7)]
    pub employee_id: i64,
    pub leave_type: LeaveType,
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
    /// Path of the uploaded file in the attachment store
    #[schema(example = "attachments/medical.pdf", nullable = true)]
    pub attachment: Option<String>,
    pub status: RequestStatus,
}

/// Leave request joined with its owner's username, for review pages.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequestRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub leave: LeaveRequest,
    #[schema(example = "alice")]
    pub employee: String,
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub attachment: Option<String>,
}

const COLUMNS: &str =
    "id, employee_id, leave_type, start_date, end_date, reason, attachment, status";

impl LeaveRequest {
    pub async fn insert(
        pool: &SqlitePool,
        employee_id: i64,
        leave: &NewLeaveRequest,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, leave_type, start_date, end_date, reason, attachment, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(leave.leave_type)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(&leave.attachment)
        .bind(RequestStatus::Pending)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = ?");
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Own requests, newest start date first.
    pub async fn list_for_employee(
        pool: &SqlitePool,
        employee_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_approved_for_employee(
        pool: &SqlitePool,
        employee_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM leave_requests WHERE employee_id = ? AND status = 'approved'"
        );
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<LeaveRequestRow>, sqlx::Error> {
        sqlx::query_as::<_, LeaveRequestRow>(
            r#"
            SELECT l.id, l.employee_id, l.leave_type, l.start_date, l.end_date,
                   l.reason, l.attachment, l.status, u.username AS employee
            FROM leave_requests l
            JOIN users u ON u.id = l.employee_id
            ORDER BY l.id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Moves a pending request to `status`. Returns false when the row was
    /// no longer pending (or no longer exists).
    pub async fn set_status_if_pending(
        pool: &SqlitePool,
        id: i64,
        status: RequestStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE leave_requests SET status = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
