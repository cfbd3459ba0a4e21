use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Holiday {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(example = "New Year's Day")]
    pub name: String,
    #[schema(example = "2027-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
}

impl Holiday {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>("SELECT id, name, date FROM holiday WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>("SELECT id, name, date FROM holiday ORDER BY date")
            .fetch_all(pool)
            .await
    }

    pub async fn list_from(pool: &SqlitePool, from: NaiveDate) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>(
            "SELECT id, name, date FROM holiday WHERE date >= ? ORDER BY date",
        )
        .bind(from)
        .fetch_all(pool)
        .await
    }

    /// Fails with a unique violation when another holiday owns `date`.
    pub async fn insert(pool: &SqlitePool, name: &str, date: NaiveDate) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO holiday (name, date) VALUES (?, ?)")
            .bind(name)
            .bind(date)
            .execute(pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        name: &str,
        date: NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE holiday SET name = ?, date = ? WHERE id = ?")
            .bind(name)
            .bind(date)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM holiday WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
