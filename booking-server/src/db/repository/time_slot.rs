//! Time Slot Repository — 容量账本
//!
//! Availability reads never lock; capacity changes go through the
//! conditional UPDATEs at the bottom, whose WHERE clause re-checks the
//! invariant so a lost race surfaces as `rows_affected == 0`, not as a
//! double booking.

use super::{RepoError, RepoResult};
use shared::models::{SeatingArea, TimeSlot, TimeSlotCreate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SLOT_SELECT: &str = "SELECT id, restaurant_id, start_time, seating_area, total_capacity, booked_capacity, is_blocked, block_reason, created_at, updated_at FROM time_slot";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TimeSlot>> {
    let sql = format!("{SLOT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TimeSlot>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Best bookable slot at exactly one grid point.
///
/// Seating preference is a ranking signal, not a filter: an exact category
/// match wins, then the most open capacity.
pub async fn find_best_at(
    pool: &SqlitePool,
    restaurant_id: i64,
    start_time: i64,
    preference: Option<SeatingArea>,
    party_size: i64,
) -> RepoResult<Option<TimeSlot>> {
    let sql = format!(
        "{SLOT_SELECT} WHERE restaurant_id = ?1 AND start_time = ?2 AND is_blocked = 0 AND total_capacity - booked_capacity >= ?3 ORDER BY CASE WHEN ?4 IS NOT NULL AND seating_area = ?4 THEN 0 ELSE 1 END, total_capacity - booked_capacity DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, TimeSlot>(&sql)
        .bind(restaurant_id)
        .bind(start_time)
        .bind(party_size)
        .bind(preference)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All slots in a time window that could seat the party, earliest first.
/// Ranking by distance/preference happens at the caller.
pub async fn find_candidates_in_window(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: i64,
    to: i64,
    party_size: i64,
) -> RepoResult<Vec<TimeSlot>> {
    let sql = format!(
        "{SLOT_SELECT} WHERE restaurant_id = ?1 AND start_time >= ?2 AND start_time <= ?3 AND is_blocked = 0 AND total_capacity - booked_capacity >= ?4 ORDER BY start_time"
    );
    let rows = sqlx::query_as::<_, TimeSlot>(&sql)
        .bind(restaurant_id)
        .bind(from)
        .bind(to)
        .bind(party_size)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: TimeSlotCreate) -> RepoResult<TimeSlot> {
    if data.total_capacity <= 0 {
        return Err(RepoError::Validation(format!(
            "Total capacity must be positive, got {}",
            data.total_capacity
        )));
    }

    // Uniqueness pre-check for a friendly error; the UNIQUE constraint
    // still backstops concurrent creates
    let sql = format!(
        "{SLOT_SELECT} WHERE restaurant_id = ? AND start_time = ? AND seating_area = ? LIMIT 1"
    );
    let existing = sqlx::query_as::<_, TimeSlot>(&sql)
        .bind(data.restaurant_id)
        .bind(data.start_time)
        .bind(data.seating_area)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Slot already exists at {} ({})",
            data.start_time,
            data.seating_area.as_str()
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO time_slot (id, restaurant_id, start_time, seating_area, total_capacity, booked_capacity, is_blocked, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?6)",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(data.start_time)
    .bind(data.seating_area)
    .bind(data.total_capacity)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create time slot".into()))
}

/// Manually block or unblock a slot (special event, maintenance)
pub async fn set_blocked(
    pool: &SqlitePool,
    id: i64,
    blocked: bool,
    reason: Option<String>,
) -> RepoResult<TimeSlot> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE time_slot SET is_blocked = ?1, block_reason = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(blocked)
    .bind(&reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Time slot {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Time slot {id} not found")))
}

/// Try-acquire: consume `party_size` seats iff the slot is unblocked and
/// still has room. Zero rows affected means the capacity was lost to a
/// concurrent booking (or the slot was blocked meanwhile) — the caller
/// maps that to a `conflict` outcome instead of waiting.
pub async fn try_acquire_capacity(
    tx: &mut Transaction<'_, Sqlite>,
    slot_id: i64,
    party_size: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE time_slot SET booked_capacity = booked_capacity + ?1, updated_at = ?2 WHERE id = ?3 AND is_blocked = 0 AND booked_capacity + ?1 <= total_capacity",
    )
    .bind(party_size)
    .bind(now)
    .bind(slot_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Release seats held by a reservation leaving CONFIRMED/SEATED status
pub async fn release_capacity(
    tx: &mut Transaction<'_, Sqlite>,
    slot_id: i64,
    party_size: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE time_slot SET booked_capacity = MAX(booked_capacity - ?1, 0), updated_at = ?2 WHERE id = ?3",
    )
    .bind(party_size)
    .bind(now)
    .bind(slot_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory pool with the time_slot schema (single connection — each
    /// in-memory connection is its own database)
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE time_slot (
                id INTEGER PRIMARY KEY,
                restaurant_id INTEGER NOT NULL,
                start_time INTEGER NOT NULL,
                seating_area TEXT NOT NULL,
                total_capacity INTEGER NOT NULL,
                booked_capacity INTEGER NOT NULL DEFAULT 0,
                is_blocked INTEGER NOT NULL DEFAULT 0,
                block_reason TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE (restaurant_id, start_time, seating_area),
                CHECK (booked_capacity >= 0 AND booked_capacity <= total_capacity)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn slot_create(start: i64, area: SeatingArea, capacity: i64) -> TimeSlotCreate {
        TimeSlotCreate {
            restaurant_id: 1,
            start_time: start,
            seating_area: area,
            total_capacity: capacity,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let pool = test_pool().await;
        create(&pool, slot_create(1000, SeatingArea::Indoor, 4))
            .await
            .unwrap();

        let err = create(&pool, slot_create(1000, SeatingArea::Indoor, 6))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // 不同座区同时间可以共存
        create(&pool, slot_create(1000, SeatingArea::Outdoor, 6))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn acquire_fails_fast_when_full() {
        let pool = test_pool().await;
        let slot = create(&pool, slot_create(1000, SeatingArea::Indoor, 4))
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert!(try_acquire_capacity(&mut tx, slot.id, 4, 1).await.unwrap());
        // 同一事务内第二次获取看到的是已扣减的余量
        assert!(!try_acquire_capacity(&mut tx, slot.id, 1, 2).await.unwrap());
        tx.commit().await.unwrap();

        let after = find_by_id(&pool, slot.id).await.unwrap().unwrap();
        assert_eq!(after.booked_capacity, 4);
        assert_eq!(after.available_capacity(), 0);
    }

    #[tokio::test]
    async fn acquire_respects_manual_block() {
        let pool = test_pool().await;
        let slot = create(&pool, slot_create(1000, SeatingArea::Indoor, 4))
            .await
            .unwrap();
        set_blocked(&pool, slot.id, true, Some("private event".into()))
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert!(!try_acquire_capacity(&mut tx, slot.id, 2, 1).await.unwrap());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn release_floors_at_zero() {
        let pool = test_pool().await;
        let slot = create(&pool, slot_create(1000, SeatingArea::Bar, 4))
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        try_acquire_capacity(&mut tx, slot.id, 2, 1).await.unwrap();
        release_capacity(&mut tx, slot.id, 5, 2).await.unwrap();
        tx.commit().await.unwrap();

        let after = find_by_id(&pool, slot.id).await.unwrap().unwrap();
        assert_eq!(after.booked_capacity, 0);
    }

    #[tokio::test]
    async fn best_at_prefers_exact_area_then_capacity() {
        let pool = test_pool().await;
        create(&pool, slot_create(1000, SeatingArea::Indoor, 4))
            .await
            .unwrap();
        create(&pool, slot_create(1000, SeatingArea::Outdoor, 10))
            .await
            .unwrap();

        // 指定座区: 即使室外余量更大也选室内
        let hit = find_best_at(&pool, 1, 1000, Some(SeatingArea::Indoor), 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.seating_area, SeatingArea::Indoor);

        // 不指定座区: 按余量取最大
        let hit = find_best_at(&pool, 1, 1000, None, 2).await.unwrap().unwrap();
        assert_eq!(hit.seating_area, SeatingArea::Outdoor);

        // 容量不足时不命中
        assert!(
            find_best_at(&pool, 1, 1000, Some(SeatingArea::Indoor), 20)
                .await
                .unwrap()
                .is_none()
        );
    }
}
