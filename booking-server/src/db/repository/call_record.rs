//! Call Record Repository — 通话日志
//!
//! `log_outcome` is the engine's one aggregate-producing write: the
//! idempotent call upsert and the daily-stats increment share a single
//! transaction, so the aggregate can never drift from the log.

use super::{RepoError, RepoResult, daily_stats};
use chrono_tz::Tz;
use shared::models::{CallOutcome, CallOutcomeLog, CallRecord, CallStatus, StatsDelta};
use sqlx::SqlitePool;

use crate::utils::time::{local_date_str, local_hour};

const CALL_SELECT: &str = "SELECT id, restaurant_id, external_call_id, caller_phone, started_at, ended_at, duration_seconds, status, outcome, safety_flag, transcript_ref, recording_ref, callback_id, created_at, updated_at FROM call_record";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CallRecord>> {
    let sql = format!("{CALL_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, CallRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_external_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    external_call_id: &str,
) -> RepoResult<Option<CallRecord>> {
    let sql = format!("{CALL_SELECT} WHERE restaurant_id = ? AND external_call_id = ?");
    let row = sqlx::query_as::<_, CallRecord>(&sql)
        .bind(restaurant_id)
        .bind(external_call_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Idempotent create-or-update keyed by (restaurant, external_call_id).
///
/// Re-logging merges newer non-null fields into the existing row; the call
/// counter and hour histogram move only on first sighting, outcome/status
/// counters move when the field first reaches a terminal value. Returns
/// the record and whether it was newly created.
pub async fn log_outcome(
    pool: &SqlitePool,
    tz: Tz,
    data: CallOutcomeLog,
) -> RepoResult<(CallRecord, bool)> {
    if data.external_call_id.trim().is_empty() {
        return Err(RepoError::Validation("External call id must not be empty".into()));
    }

    let now = shared::util::now_millis();

    // Read the previous state outside the transaction; the write below is
    // the transaction's first statement so concurrent loggers serialize on
    // busy_timeout
    let previous = find_by_external_id(pool, data.restaurant_id, &data.external_call_id).await?;
    let created = previous.is_none();

    let mut tx = pool.begin().await?;

    let duration_seconds = match (data.started_at, data.ended_at) {
        (Some(start), Some(end)) if end >= start => Some((end - start) / 1000),
        _ => None,
    };

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO call_record (id, restaurant_id, external_call_id, caller_phone, started_at, ended_at, duration_seconds, status, outcome, safety_flag, transcript_ref, recording_ref, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13) \
         ON CONFLICT(restaurant_id, external_call_id) DO UPDATE SET \
            caller_phone = COALESCE(excluded.caller_phone, caller_phone), \
            started_at = COALESCE(excluded.started_at, started_at), \
            ended_at = COALESCE(excluded.ended_at, ended_at), \
            duration_seconds = COALESCE(excluded.duration_seconds, duration_seconds), \
            status = COALESCE(excluded.status, status), \
            outcome = COALESCE(excluded.outcome, outcome), \
            safety_flag = MAX(safety_flag, excluded.safety_flag), \
            transcript_ref = COALESCE(excluded.transcript_ref, transcript_ref), \
            recording_ref = COALESCE(excluded.recording_ref, recording_ref), \
            updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(&data.external_call_id)
    .bind(&data.caller_phone)
    .bind(data.started_at)
    .bind(data.ended_at)
    .bind(duration_seconds)
    .bind(data.status)
    .bind(data.outcome)
    .bind(data.safety_flag)
    .bind(&data.transcript_ref)
    .bind(&data.recording_ref)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let anchor = data.started_at.unwrap_or(now);
    let mut delta = build_delta(previous.as_ref(), &data, created);
    if created {
        delta.call_hour = Some(local_hour(anchor, tz));
    }
    let stat_date = local_date_str(anchor, tz);
    daily_stats::apply_delta(&mut tx, data.restaurant_id, &stat_date, delta, now).await?;

    tx.commit().await?;

    let record = find_by_external_id(pool, data.restaurant_id, &data.external_call_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to log call outcome".into()))?;

    Ok((record, created))
}

/// Aggregate movement caused by one log event against the previous state
fn build_delta(previous: Option<&CallRecord>, data: &CallOutcomeLog, created: bool) -> StatsDelta {
    let mut delta = StatsDelta::default();

    if created {
        delta.calls = 1;
    }

    let prev_status = previous.and_then(|p| p.status);
    let effective_status = data.status.or(prev_status);
    if prev_status != effective_status {
        match effective_status {
            Some(CallStatus::Completed) => delta.completed_calls = 1,
            Some(CallStatus::Failed) | Some(CallStatus::Abandoned) => delta.failed_calls = 1,
            _ => {}
        }
    }

    let prev_outcome = previous.and_then(|p| p.outcome);
    let effective_outcome = data.outcome.or(prev_outcome);
    if prev_outcome != effective_outcome {
        match effective_outcome {
            Some(CallOutcome::BookingMade) => delta.bookings_made = 1,
            Some(CallOutcome::CallbackCreated) => delta.callbacks_created = 1,
            _ => {}
        }
    }

    let prev_safety = previous.map(|p| p.safety_flag).unwrap_or(false);
    if data.safety_flag && !prev_safety {
        delta.safety_triggers = 1;
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE call_record (
                id INTEGER PRIMARY KEY,
                restaurant_id INTEGER NOT NULL,
                external_call_id TEXT NOT NULL,
                caller_phone TEXT,
                started_at INTEGER,
                ended_at INTEGER,
                duration_seconds INTEGER,
                status TEXT,
                outcome TEXT,
                safety_flag INTEGER NOT NULL DEFAULT 0,
                transcript_ref TEXT,
                recording_ref TEXT,
                callback_id INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE (restaurant_id, external_call_id)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE daily_stats (
                restaurant_id INTEGER NOT NULL,
                stat_date TEXT NOT NULL,
                total_calls INTEGER NOT NULL DEFAULT 0,
                completed_calls INTEGER NOT NULL DEFAULT 0,
                failed_calls INTEGER NOT NULL DEFAULT 0,
                bookings_made INTEGER NOT NULL DEFAULT 0,
                callbacks_created INTEGER NOT NULL DEFAULT 0,
                safety_triggers INTEGER NOT NULL DEFAULT 0,
                hour_histogram TEXT NOT NULL DEFAULT '[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]',
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (restaurant_id, stat_date)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn log(external_id: &str) -> CallOutcomeLog {
        CallOutcomeLog {
            restaurant_id: 1,
            external_call_id: external_id.into(),
            caller_phone: Some("+34600123456".into()),
            started_at: Some(1_754_000_000_000),
            ended_at: None,
            status: None,
            outcome: None,
            safety_flag: false,
            transcript_ref: None,
            recording_ref: None,
        }
    }

    #[tokio::test]
    async fn same_external_id_merges_into_one_record() {
        let pool = test_pool().await;
        let tz = chrono_tz::UTC;

        let (first, created) = log_outcome(&pool, tz, log("ext-42")).await.unwrap();
        assert!(created);
        assert_eq!(first.status, None);

        // 通话结束后补终态字段
        let mut second = log("ext-42");
        second.ended_at = Some(1_754_000_180_000);
        second.status = Some(CallStatus::Completed);
        second.outcome = Some(CallOutcome::BookingMade);
        second.transcript_ref = Some("s3://transcripts/ext-42".into());
        let (merged, created) = log_outcome(&pool, tz, second).await.unwrap();
        assert!(!created);

        assert_eq!(merged.id, first.id);
        assert_eq!(merged.status, Some(CallStatus::Completed));
        assert_eq!(merged.outcome, Some(CallOutcome::BookingMade));
        assert_eq!(merged.duration_seconds, Some(180));
        // 首次记录的字段不丢
        assert_eq!(merged.caller_phone.as_deref(), Some("+34600123456"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM call_record")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn aggregates_move_once_per_call() {
        let pool = test_pool().await;
        let tz = chrono_tz::UTC;

        log_outcome(&pool, tz, log("ext-1")).await.unwrap();

        let mut finish = log("ext-1");
        finish.status = Some(CallStatus::Completed);
        finish.outcome = Some(CallOutcome::BookingMade);
        log_outcome(&pool, tz, finish.clone()).await.unwrap();
        // 重放同一条终态日志
        log_outcome(&pool, tz, finish).await.unwrap();

        let date = local_date_str(1_754_000_000_000, tz);
        let stats = daily_stats::find(&pool, 1, &date).await.unwrap().unwrap();
        assert_eq!(stats.total_calls, 1);
        assert_eq!(stats.completed_calls, 1);
        assert_eq!(stats.bookings_made, 1);
        assert_eq!(stats.histogram().iter().sum::<i64>(), 1);
    }

    #[tokio::test]
    async fn safety_flag_counts_once_and_sticks() {
        let pool = test_pool().await;
        let tz = chrono_tz::UTC;

        let mut first = log("ext-9");
        first.safety_flag = true;
        log_outcome(&pool, tz, first).await.unwrap();

        // 后续不带 safety 标志的补录不清掉它
        let (record, _) = log_outcome(&pool, tz, log("ext-9")).await.unwrap();
        assert!(record.safety_flag);

        let mut again = log("ext-9");
        again.safety_flag = true;
        log_outcome(&pool, tz, again).await.unwrap();

        let date = local_date_str(1_754_000_000_000, tz);
        let stats = daily_stats::find(&pool, 1, &date).await.unwrap().unwrap();
        assert_eq!(stats.safety_triggers, 1);
    }

    #[tokio::test]
    async fn empty_external_id_is_rejected() {
        let pool = test_pool().await;
        let mut bad = log("  ");
        bad.external_call_id = "  ".into();
        let err = log_outcome(&pool, chrono_tz::UTC, bad).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
