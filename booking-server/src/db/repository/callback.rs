//! Callback Repository — 人工回拨队列
//!
//! List ordering is a contract with the staff dashboard: priority, then
//! age, then id — the id tiebreak keeps refreshes stable when several
//! callbacks share a creation millisecond.

use super::{RepoError, RepoResult};
use shared::models::{Callback, CallbackCreate, CallbackResolve};
use sqlx::SqlitePool;

const CALLBACK_SELECT: &str = "SELECT id, restaurant_id, call_record_id, reservation_id, customer_name, customer_phone, requested_time, party_size, seating_area, notes, cause, priority, status, claimed_by, resolved_by, resolution_outcome, resolution_notes, resolved_at, created_at, updated_at FROM callback";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Callback>> {
    let sql = format!("{CALLBACK_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Callback>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a pending callback; priority comes from the fixed cause table.
///
/// When a call record is referenced, the call row is back-linked to this
/// callback in the same transaction.
pub async fn create(pool: &SqlitePool, data: CallbackCreate) -> RepoResult<Callback> {
    if data.customer_phone.trim().is_empty() {
        return Err(RepoError::Validation("Customer phone must not be empty".into()));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let priority = data.cause.priority();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO callback (id, restaurant_id, call_record_id, reservation_id, customer_name, customer_phone, requested_time, party_size, seating_area, notes, cause, priority, status, created_at, updated_at) VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 'PENDING', ?12, ?12)",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(data.call_record_id)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(data.requested_time)
    .bind(data.party_size)
    .bind(data.seating_area)
    .bind(&data.notes)
    .bind(data.cause)
    .bind(priority)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if let Some(call_id) = data.call_record_id {
        sqlx::query(
            "UPDATE call_record SET callback_id = ?1, updated_at = ?2 WHERE id = ?3 AND restaurant_id = ?4",
        )
        .bind(id)
        .bind(now)
        .bind(call_id)
        .bind(data.restaurant_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create callback".into()))
}

/// Open items ordered by priority, then age, then id (stable tiebreak)
pub async fn list_pending(
    pool: &SqlitePool,
    restaurant_id: i64,
    limit: i64,
) -> RepoResult<Vec<Callback>> {
    let sql = format!(
        "{CALLBACK_SELECT} WHERE restaurant_id = ? AND status IN ('PENDING', 'IN_PROGRESS') ORDER BY priority ASC, created_at ASC, id ASC LIMIT ?"
    );
    let rows = sqlx::query_as::<_, Callback>(&sql)
        .bind(restaurant_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Claim a pending callback for a staff member (PENDING → IN_PROGRESS)
pub async fn claim(pool: &SqlitePool, id: i64, staff: &str) -> RepoResult<Callback> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE callback SET status = 'IN_PROGRESS', claimed_by = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'PENDING'",
    )
    .bind(staff)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Callback {id} not found"))),
            Some(cb) => Err(RepoError::Conflict(format!(
                "Callback {id} is not claimable (status {:?})",
                cb.status
            ))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Callback {id} not found")))
}

/// Resolve an open callback; resolving twice is rejected.
pub async fn resolve(pool: &SqlitePool, id: i64, data: CallbackResolve) -> RepoResult<Callback> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE callback SET status = 'RESOLVED', resolved_by = ?1, resolution_outcome = ?2, resolution_notes = ?3, reservation_id = COALESCE(?4, reservation_id), resolved_at = ?5, updated_at = ?5 WHERE id = ?6 AND status IN ('PENDING', 'IN_PROGRESS')",
    )
    .bind(&data.resolved_by)
    .bind(&data.outcome)
    .bind(&data.notes)
    .bind(data.reservation_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        // 区分不存在 vs 已处理
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Callback {id} not found"))),
            Some(_) => Err(RepoError::Duplicate(format!(
                "Callback {id} is already resolved"
            ))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Callback {id} not found")))
}
