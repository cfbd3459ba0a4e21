use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
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
pub enum WorkMode {
    Office,
    Wfh,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 12)]
    pub id: i64,
    #[schema(example = 7)]
    pub employee_id: i64,
    #[schema(example = "2024-02-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:00:00", value_type = Option<String>)]
    pub check_in: Option<NaiveTime>,
    #[schema(example = "17:30:00", value_type = Option<String>)]
    pub check_out: Option<NaiveTime>,
    pub work_mode: WorkMode,
}

/// Attendance joined with its owner's username, for HR reports.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attendance: Attendance,
    #[schema(example = "bob")]
    pub employee: String,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub work_mode: WorkMode,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

const COLUMNS: &str = "id, employee_id, date, check_in, check_out, work_mode";

impl Attendance {
    pub async fn exists_for(
        pool: &SqlitePool,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendance WHERE employee_id = ? AND date = ?)",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(pool)
        .await
    }

    pub async fn find_for(
        pool: &SqlitePool,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?");
        sqlx::query_as::<_, Attendance>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Plain insert. A second row for the same (employee, date) is rejected
    /// by the store with a unique violation; it is never overwritten.
    pub async fn insert(
        pool: &SqlitePool,
        employee_id: i64,
        date: NaiveDate,
        record: &NewAttendance,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, check_in, check_out, work_mode)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.work_mode)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Single-statement insert-or-update keyed by (employee, date).
    pub async fn upsert_work_mode(
        tx: &mut Transaction<'_, Sqlite>,
        employee_id: i64,
        date: NaiveDate,
        work_mode: WorkMode,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, work_mode)
            VALUES (?, ?, ?)
            ON CONFLICT (employee_id, date) DO UPDATE SET work_mode = excluded.work_mode
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(work_mode)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Every record with `start <= date <= end`, oldest first.
    pub async fn list_between(
        pool: &SqlitePool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRow>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT a.id, a.employee_id, a.date, a.check_in, a.check_out, a.work_mode,
                   u.username AS employee
            FROM attendance a
            JOIN users u ON u.id = a.employee_id
            WHERE a.date BETWEEN ? AND ?
            ORDER BY a.date, u.username
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_employee_between(
        pool: &SqlitePool,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM attendance WHERE employee_id = ? AND date BETWEEN ? AND ? ORDER BY date"
        );
        sqlx::query_as::<_, Attendance>(&sql)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
