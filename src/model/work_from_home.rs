use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::model::attendance::{Attendance, WorkMode};
use crate::model::status::RequestStatus;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct WorkFromHome {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = 7)]
    pub employee_id: i64,
    #[schema(example = "2024-02-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct WorkFromHomeRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub request: WorkFromHome,
    #[schema(example = "bob")]
    pub employee: String,
}

#[derive(Debug, Clone)]
pub struct NewWorkFromHome {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

const COLUMNS: &str = "id, employee_id, date, start_time, end_time, status";

impl WorkFromHome {
    pub async fn insert(
        pool: &SqlitePool,
        employee_id: i64,
        request: &NewWorkFromHome,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO work_from_home (employee_id, date, start_time, end_time, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(request.date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(RequestStatus::Pending)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM work_from_home WHERE id = ?");
        sqlx::query_as::<_, WorkFromHome>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_employee(
        pool: &SqlitePool,
        employee_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM work_from_home WHERE employee_id = ? ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, WorkFromHome>(&sql)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<WorkFromHomeRow>, sqlx::Error> {
        sqlx::query_as::<_, WorkFromHomeRow>(
            r#"
            SELECT w.id, w.employee_id, w.date, w.start_time, w.end_time, w.status,
                   u.username AS employee
            FROM work_from_home w
            JOIN users u ON u.id = w.employee_id
            ORDER BY w.date DESC, w.id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn reject_if_pending(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_from_home SET status = 'rejected' WHERE id = ? AND status = 'pending'",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Approves a pending request and marks the day as worked from home, in
    /// one transaction. Returns false (and writes nothing) when the request
    /// was no longer pending.
    pub async fn approve_if_pending(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let approved = sqlx::query_as::<_, (i64, NaiveDate)>(
            r#"
            UPDATE work_from_home SET status = 'approved'
            WHERE id = ? AND status = 'pending'
            RETURNING employee_id, date
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((employee_id, date)) = approved else {
            tx.rollback().await?;
            return Ok(false);
        };

        Attendance::upsert_work_mode(&mut tx, employee_id, date, WorkMode::Wfh).await?;
        tx.commit().await?;

        Ok(true)
    }
}
