//! Availability Search — read-only, lock-free
//!
//! Results are advisory: a slot offered here can be gone by the time the
//! booking transaction runs, which re-verifies capacity under its own
//! conditional update. Repeated queries during a conversation are
//! side-effect-free.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{SeatingArea, TimeSlot};
use shared::request::CheckAvailabilityRequest;
use shared::response::{AvailabilityResponse, AvailabilityStatus, SlotOption};
use sqlx::SqlitePool;

use super::hours::{self, HoursVerdict};
use crate::db::repository::{date_block, restaurant, time_slot};
use crate::utils::time::{local_date_str, millis_to_local, round_to_grid};
use crate::utils::validation::validate_party_size;

/// Alternative search reaches ±2 hours around the requested grid point
pub const WINDOW_MILLIS: i64 = 2 * 60 * 60 * 1000;

/// At most this many alternatives are offered
pub const MAX_ALTERNATIVES: usize = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Run the availability lookup for one spoken request.
pub async fn check_availability(
    pool: &SqlitePool,
    req: &CheckAvailabilityRequest,
) -> AppResult<AvailabilityResponse> {
    let restaurant = restaurant::find_by_id(pool, req.restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let settings = restaurant.settings();
    validate_party_size(req.party_size, settings.max_party_size)?;

    let now = shared::util::now_millis();
    if req.desired_time <= now {
        return Err(AppError::new(ErrorCode::InvalidDate));
    }
    let horizon = settings.booking_horizon_days.max(0) * MILLIS_PER_DAY;
    if req.desired_time > now + horizon {
        return Err(AppError::with_message(
            ErrorCode::DateTooFar,
            format!(
                "We only take bookings up to {} days ahead",
                settings.booking_horizon_days
            ),
        ));
    }

    let tz = restaurant.tz();
    let local = millis_to_local(req.desired_time, tz);
    let weekday = local.format("%A").to_string();

    // 1. Opening hours for that weekday
    let window = match hours::classify(&restaurant, local.date_naive(), req.desired_time) {
        HoursVerdict::Closed => {
            return Ok(unavailable(
                ErrorCode::RestaurantClosed,
                format!("We're closed on {weekday}s."),
            ));
        }
        HoursVerdict::OutsideHours(window) => {
            let open = millis_to_local(window.open, tz).format("%H:%M");
            let last = millis_to_local(window.last_seating, tz).format("%H:%M");
            return Ok(unavailable(
                ErrorCode::OutsideHours,
                format!("On {weekday}s we seat from {open} until {last}."),
            ));
        }
        HoursVerdict::Within(window) => window,
    };

    // 2. Date-level blocks (closures, private events)
    let date_str = local_date_str(req.desired_time, tz);
    if let Some(block) = date_block::find_for_date(pool, restaurant.id, &date_str)
        .await
        .map_err(AppError::from)?
    {
        return Ok(unavailable(
            ErrorCode::DateBlocked,
            format!("We're not taking bookings that day: {}.", block.reason),
        ));
    }

    // 3. Normalize to the 30-minute grid (ties round up)
    let grid_time = round_to_grid(req.desired_time, tz);

    // 4. Exact grid-point lookup
    if let Some(slot) = time_slot::find_best_at(
        pool,
        restaurant.id,
        grid_time,
        req.seating_preference,
        req.party_size,
    )
    .await
    .map_err(AppError::from)?
    {
        let when = millis_to_local(slot.start_time, tz).format("%H:%M");
        let message = format!(
            "Yes, we can seat a party of {} {} at {when} on {weekday}.",
            req.party_size,
            slot.seating_area.spoken_label(),
        );
        return Ok(AvailabilityResponse {
            status: AvailabilityStatus::Available,
            reason: None,
            requested: Some(slot_option(&slot)),
            alternatives: Vec::new(),
            message,
        });
    }

    // 5. ±2h window, clipped to the day's bookable hours
    let from = (grid_time - WINDOW_MILLIS).max(window.open);
    let to = (grid_time + WINDOW_MILLIS).min(window.last_seating);
    let candidates =
        time_slot::find_candidates_in_window(pool, restaurant.id, from, to, req.party_size)
            .await
            .map_err(AppError::from)?;

    let ranked = rank_alternatives(candidates, grid_time, req.seating_preference);
    if ranked.is_empty() {
        let when = millis_to_local(grid_time, tz).format("%H:%M");
        return Ok(unavailable_no_reason(format!(
            "We're fully booked around {when} that day."
        )));
    }

    let spoken: Vec<String> = ranked
        .iter()
        .map(|s| {
            format!(
                "{} {}",
                millis_to_local(s.start_time, tz).format("%H:%M"),
                s.seating_area.spoken_label()
            )
        })
        .collect();
    let message = format!(
        "We don't have that exact time, but we could offer {}.",
        spoken.join(" or ")
    );

    Ok(AvailabilityResponse {
        status: AvailabilityStatus::PartialMatch,
        reason: None,
        requested: None,
        alternatives: ranked.iter().map(slot_option).collect(),
        message,
    })
}

/// Rank window candidates: time distance, then seating-preference match,
/// then earliest; keep the top [`MAX_ALTERNATIVES`].
fn rank_alternatives(
    mut candidates: Vec<TimeSlot>,
    grid_time: i64,
    preference: Option<SeatingArea>,
) -> Vec<TimeSlot> {
    candidates.sort_by_key(|slot| {
        let distance = (slot.start_time - grid_time).abs();
        let pref_mismatch = match preference {
            Some(pref) => slot.seating_area != pref,
            None => false,
        };
        (distance, pref_mismatch, slot.start_time)
    });
    candidates.truncate(MAX_ALTERNATIVES);
    candidates
}

fn slot_option(slot: &TimeSlot) -> SlotOption {
    SlotOption {
        time_slot_id: slot.id,
        start_time: slot.start_time,
        seating_area: slot.seating_area,
        available_capacity: slot.available_capacity(),
    }
}

fn unavailable(reason: ErrorCode, message: String) -> AvailabilityResponse {
    AvailabilityResponse {
        status: AvailabilityStatus::Unavailable,
        reason: Some(reason),
        requested: None,
        alternatives: Vec::new(),
        message,
    }
}

fn unavailable_no_reason(message: String) -> AvailabilityResponse {
    AvailabilityResponse {
        status: AvailabilityStatus::Unavailable,
        reason: None,
        requested: None,
        alternatives: Vec::new(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64, start: i64, area: SeatingArea) -> TimeSlot {
        TimeSlot {
            id,
            restaurant_id: 1,
            start_time: start,
            seating_area: area,
            total_capacity: 6,
            booked_capacity: 0,
            is_blocked: false,
            block_reason: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    const HALF_HOUR: i64 = 30 * 60 * 1000;

    #[test]
    fn ranking_is_distance_then_preference_then_earliest() {
        let grid = 10 * HALF_HOUR;
        let candidates = vec![
            slot(1, grid + 2 * HALF_HOUR, SeatingArea::Indoor), // +1h indoor
            slot(2, grid - HALF_HOUR, SeatingArea::Outdoor),    // -30m outdoor
            slot(3, grid + HALF_HOUR, SeatingArea::Indoor),     // +30m indoor
        ];

        let ranked = rank_alternatives(candidates, grid, Some(SeatingArea::Indoor));
        // 同距离 30 分钟: 座区匹配的 +30m 室内排前
        let ids: Vec<i64> = ranked.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn equal_everything_prefers_earliest() {
        let grid = 10 * HALF_HOUR;
        let candidates = vec![
            slot(1, grid + HALF_HOUR, SeatingArea::Indoor),
            slot(2, grid - HALF_HOUR, SeatingArea::Indoor),
        ];
        let ranked = rank_alternatives(candidates, grid, None);
        let ids: Vec<i64> = ranked.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn at_most_three_alternatives() {
        let grid = 10 * HALF_HOUR;
        let candidates = (0..6)
            .map(|i| slot(i, grid + (i + 1) * HALF_HOUR, SeatingArea::Indoor))
            .collect();
        let ranked = rank_alternatives(candidates, grid, None);
        assert_eq!(ranked.len(), MAX_ALTERNATIVES);
    }
}
