//! Reservation Repository
//!
//! Status transitions are the only write path that touches a slot's booked
//! capacity outside the booking transaction; the transition and the ledger
//! adjustment always share one transaction.

use super::{RepoError, RepoResult, time_slot};
use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use sqlx::{Sqlite, SqlitePool, Transaction};

const RESERVATION_SELECT: &str = "SELECT id, restaurant_id, time_slot_id, customer_id, call_record_id, confirmation_code, party_size, seating_area, special_requests, status, created_at, updated_at FROM reservation";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_code(
    pool: &SqlitePool,
    restaurant_id: i64,
    code: &str,
) -> RepoResult<Option<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE restaurant_id = ? AND confirmation_code = ?");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(restaurant_id)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Reservations starting within [from, to), for the staff dashboard
pub async fn find_by_time_range(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<Reservation>> {
    let sql = format!(
        "{RESERVATION_SELECT} WHERE restaurant_id = ?1 AND time_slot_id IN (SELECT id FROM time_slot WHERE restaurant_id = ?1 AND start_time >= ?2 AND start_time < ?3) ORDER BY created_at"
    );
    let rows = sqlx::query_as::<_, Reservation>(&sql)
        .bind(restaurant_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Does this confirmation code already exist for the restaurant?
/// Checked against the live reservation set inside the booking transaction.
pub async fn code_exists_tx(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: i64,
    code: &str,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation WHERE restaurant_id = ? AND confirmation_code = ?",
    )
    .bind(restaurant_id)
    .bind(code)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count > 0)
}

/// Insert a CONFIRMED reservation inside the booking transaction.
///
/// The caller has already acquired the slot capacity in the same
/// transaction — the two writes commit or roll back together.
pub async fn insert_confirmed_tx(
    tx: &mut Transaction<'_, Sqlite>,
    data: &ReservationCreate,
    confirmation_code: &str,
    now: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reservation (id, restaurant_id, time_slot_id, customer_id, call_record_id, confirmation_code, party_size, seating_area, special_requests, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'CONFIRMED', ?10, ?10)",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(data.time_slot_id)
    .bind(data.customer_id)
    .bind(data.call_record_id)
    .bind(confirmation_code)
    .bind(data.party_size)
    .bind(data.seating_area)
    .bind(&data.special_requests)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// Transition a reservation's lifecycle status.
///
/// The capacity side effect is inseparable from the status change:
/// - leaving CONFIRMED/SEATED releases the seats
/// - re-entering CONFIRMED (from CANCELLED) re-acquires them with the same
///   fail-fast conditional check as booking, so a rebook into a refilled
///   slot conflicts instead of overbooking
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    new_status: ReservationStatus,
) -> RepoResult<Reservation> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))?;

    if !current.status.can_transition_to(new_status) {
        return Err(RepoError::Validation(format!(
            "Cannot transition reservation {id} from {:?} to {:?}",
            current.status, new_status
        )));
    }

    let was_holding = current.status.holds_capacity();
    let will_hold = new_status.holds_capacity();

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    // The guarded status flip is the transaction's first write; a
    // concurrent transition that committed since the read above makes it
    // match zero rows
    let rows = sqlx::query(
        "UPDATE reservation SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(new_status)
    .bind(now)
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Reservation {id} was modified concurrently"
        )));
    }

    if let Some(slot_id) = current.time_slot_id {
        if was_holding && !will_hold {
            time_slot::release_capacity(&mut tx, slot_id, current.party_size, now).await?;
        } else if !was_holding && will_hold {
            let acquired =
                time_slot::try_acquire_capacity(&mut tx, slot_id, current.party_size, now).await?;
            if !acquired {
                // 回滚也撤销上面的状态变更
                return Err(RepoError::Conflict(format!(
                    "Slot {slot_id} can no longer seat a party of {}",
                    current.party_size
                )));
            }
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}
