//! Date Block Repository — 整日封禁 (闭店、包场)

use super::{RepoError, RepoResult};
use shared::models::{DateBlock, DateBlockCreate};
use sqlx::SqlitePool;

const DATE_BLOCK_SELECT: &str =
    "SELECT id, restaurant_id, block_date, reason, created_at FROM date_block";

/// Block on a specific local date, if any
pub async fn find_for_date(
    pool: &SqlitePool,
    restaurant_id: i64,
    date: &str,
) -> RepoResult<Option<DateBlock>> {
    let sql = format!("{DATE_BLOCK_SELECT} WHERE restaurant_id = ? AND block_date = ?");
    let row = sqlx::query_as::<_, DateBlock>(&sql)
        .bind(restaurant_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_upcoming(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<DateBlock>> {
    let sql = format!(
        "{DATE_BLOCK_SELECT} WHERE restaurant_id = ? ORDER BY block_date"
    );
    let rows = sqlx::query_as::<_, DateBlock>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: DateBlockCreate) -> RepoResult<DateBlock> {
    crate::utils::time::parse_date(&data.block_date)
        .map_err(|_| RepoError::Validation(format!("Invalid date: {}", data.block_date)))?;
    if data.reason.trim().is_empty() {
        return Err(RepoError::Validation("Block reason must not be empty".into()));
    }

    if find_for_date(pool, data.restaurant_id, &data.block_date)
        .await?
        .is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Date {} is already blocked",
            data.block_date
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO date_block (id, restaurant_id, block_date, reason, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(&data.block_date)
    .bind(&data.reason)
    .bind(now)
    .execute(pool)
    .await?;

    find_for_date(pool, data.restaurant_id, &data.block_date)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create date block".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM date_block WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
