//! Restaurant Repository

use super::{RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use sqlx::SqlitePool;

const RESTAURANT_SELECT: &str = "SELECT id, name, timezone, weekly_hours, max_party_size, large_party_threshold, last_seating_offset_min, booking_horizon_days, is_active, created_at, updated_at FROM restaurant";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let sql = format!("{RESTAURANT_SELECT} WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Restaurant>> {
    let sql = format!("{RESTAURANT_SELECT} WHERE is_active = 1 ORDER BY name");
    let rows = sqlx::query_as::<_, Restaurant>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: RestaurantCreate) -> RepoResult<Restaurant> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Restaurant name must not be empty".into()));
    }
    if data.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(RepoError::Validation(format!(
            "Unknown timezone: {}",
            data.timezone
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let hours_json = serde_json::to_string(&data.weekly_hours)
        .map_err(|e| RepoError::Validation(format!("Invalid weekly hours: {e}")))?;

    sqlx::query(
        "INSERT INTO restaurant (id, name, timezone, weekly_hours, max_party_size, large_party_threshold, last_seating_offset_min, booking_horizon_days, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.timezone)
    .bind(&hours_json)
    .bind(data.max_party_size.unwrap_or(20))
    .bind(data.large_party_threshold.unwrap_or(8))
    .bind(data.last_seating_offset_min.unwrap_or(60))
    .bind(data.booking_horizon_days.unwrap_or(90))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: RestaurantUpdate) -> RepoResult<Restaurant> {
    if let Some(ref tz) = data.timezone
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        return Err(RepoError::Validation(format!("Unknown timezone: {tz}")));
    }

    let hours_json = match &data.weekly_hours {
        Some(hours) => Some(
            serde_json::to_string(hours)
                .map_err(|e| RepoError::Validation(format!("Invalid weekly hours: {e}")))?,
        ),
        None => None,
    };

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE restaurant SET name = COALESCE(?1, name), timezone = COALESCE(?2, timezone), weekly_hours = COALESCE(?3, weekly_hours), max_party_size = COALESCE(?4, max_party_size), large_party_threshold = COALESCE(?5, large_party_threshold), last_seating_offset_min = COALESCE(?6, last_seating_offset_min), booking_horizon_days = COALESCE(?7, booking_horizon_days), is_active = COALESCE(?8, is_active), updated_at = ?9 WHERE id = ?10",
    )
    .bind(&data.name)
    .bind(&data.timezone)
    .bind(&hours_json)
    .bind(data.max_party_size)
    .bind(data.large_party_threshold)
    .bind(data.last_seating_offset_min)
    .bind(data.booking_horizon_days)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Restaurant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))
}
