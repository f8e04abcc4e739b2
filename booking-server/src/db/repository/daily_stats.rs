//! Daily Stats Repository — 按日聚合
//!
//! Counters only ever increment, through a single upsert-and-increment
//! statement — never read-modify-write in the application, so concurrent
//! call completions cannot lose updates. The per-hour histogram is updated
//! in place with SQLite's JSON functions inside the same statement.

use super::RepoResult;
use shared::models::{DailyStats, StatsDelta};
use sqlx::{Sqlite, SqlitePool, Transaction};

const STATS_SELECT: &str = "SELECT restaurant_id, stat_date, total_calls, completed_calls, failed_calls, bookings_made, callbacks_created, safety_triggers, hour_histogram, updated_at FROM daily_stats";

pub async fn find(
    pool: &SqlitePool,
    restaurant_id: i64,
    stat_date: &str,
) -> RepoResult<Option<DailyStats>> {
    let sql = format!("{STATS_SELECT} WHERE restaurant_id = ? AND stat_date = ?");
    let row = sqlx::query_as::<_, DailyStats>(&sql)
        .bind(restaurant_id)
        .bind(stat_date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_range(
    pool: &SqlitePool,
    restaurant_id: i64,
    from_date: &str,
    to_date: &str,
) -> RepoResult<Vec<DailyStats>> {
    let sql = format!(
        "{STATS_SELECT} WHERE restaurant_id = ? AND stat_date >= ? AND stat_date <= ? ORDER BY stat_date"
    );
    let rows = sqlx::query_as::<_, DailyStats>(&sql)
        .bind(restaurant_id)
        .bind(from_date)
        .bind(to_date)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fold one delta into the day's row, creating it if needed.
///
/// Runs inside the caller's transaction so the aggregate moves atomically
/// with the activity that produced it.
pub async fn apply_delta(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: i64,
    stat_date: &str,
    delta: StatsDelta,
    now: i64,
) -> RepoResult<()> {
    // Histogram for the insert arm; the update arm adjusts in SQL
    let mut initial = [0i64; 24];
    if let Some(hour) = delta.call_hour {
        initial[hour.min(23) as usize] = delta.calls;
    }
    let initial_json = serde_json::to_string(&initial.to_vec())
        .unwrap_or_else(|_| "[]".to_string());
    let hour_index: Option<i64> = delta.call_hour.map(|h| i64::from(h.min(23)));

    sqlx::query(
        "INSERT INTO daily_stats (restaurant_id, stat_date, total_calls, completed_calls, failed_calls, bookings_made, callbacks_created, safety_triggers, hour_histogram, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
         ON CONFLICT(restaurant_id, stat_date) DO UPDATE SET \
            total_calls = total_calls + ?3, \
            completed_calls = completed_calls + ?4, \
            failed_calls = failed_calls + ?5, \
            bookings_made = bookings_made + ?6, \
            callbacks_created = callbacks_created + ?7, \
            safety_triggers = safety_triggers + ?8, \
            hour_histogram = CASE WHEN ?11 IS NULL THEN hour_histogram \
                ELSE json_set(hour_histogram, '$[' || ?11 || ']', COALESCE(json_extract(hour_histogram, '$[' || ?11 || ']'), 0) + ?3) END, \
            updated_at = ?10",
    )
    .bind(restaurant_id)
    .bind(stat_date)
    .bind(delta.calls)
    .bind(delta.completed_calls)
    .bind(delta.failed_calls)
    .bind(delta.bookings_made)
    .bind(delta.callbacks_created)
    .bind(delta.safety_triggers)
    .bind(&initial_json)
    .bind(now)
    .bind(hour_index)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
