use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::model::role::Role;

/// Stored account row, password hash included. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub employee_code: Option<String>,
}

/// Roster entry as shown on list pages.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserSummary {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@company.com", nullable = true)]
    pub email: Option<String>,
    pub role: Role,
    #[schema(example = 1, nullable = true)]
    pub department_id: Option<i64>,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "EMP001", nullable = true)]
    pub employee_code: Option<String>,
}

/// A validated account ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub employee_code: Option<String>,
}

const SUMMARY_COLUMNS: &str = r#"
    SELECT u.id, u.username, u.email, u.role, u.department_id,
           d.name AS department, u.employee_code
    FROM users u
    LEFT JOIN department d ON d.id = u.department_id
"#;

impl User {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, role, department_id, employee_code
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, role, department_id, employee_code
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(pool: &SqlitePool, user: &NewUser) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, role, department_id, employee_code)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.department_id)
        .bind(&user.employee_code)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_by_role(pool: &SqlitePool, role: Role) -> Result<Vec<UserSummary>, sqlx::Error> {
        let sql = format!("{SUMMARY_COLUMNS} WHERE u.role = ? ORDER BY u.username");
        sqlx::query_as::<_, UserSummary>(&sql)
            .bind(role)
            .fetch_all(pool)
            .await
    }

    pub async fn list_non_admin(pool: &SqlitePool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let sql = format!("{SUMMARY_COLUMNS} WHERE u.role <> 'admin' ORDER BY u.username");
        sqlx::query_as::<_, UserSummary>(&sql).fetch_all(pool).await
    }

    pub async fn admin_exists(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await
    }

    /// Deletes a non-admin account. Admin rows are never matched, so an
    /// attempt against one affects nothing.
    pub async fn delete_non_admin(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ? AND role <> 'admin'")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            department_id: self.department_id,
            department: None,
            employee_code: self.employee_code.clone(),
        }
    }
}
