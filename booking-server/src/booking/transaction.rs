//! Booking Transaction — 原子预订
//!
//! One transaction covers slot acquisition, customer upsert, and the
//! reservation insert. A crash anywhere in between leaves no visible
//! effect; losing the capacity race surfaces as a `conflict` outcome, not
//! as blocking or a double booking.
//!
//! The conditional capacity UPDATE is the transaction's first statement,
//! so the write lock is taken up front and concurrent bookers serialize on
//! busy_timeout instead of failing on a stale read snapshot.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CustomerUpsert, Reservation, ReservationCreate, Restaurant, TimeSlot};
use shared::request::CreateBookingRequest;
use shared::response::{BookingResponse, BookingStatus};
use shared::util::phone_fingerprint;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::confirmation;
use crate::db::repository::{customer, reservation, restaurant, time_slot};
use crate::utils::time::{millis_to_local, round_to_grid};
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_customer_name, validate_optional_email, validate_optional_text,
    validate_party_size, validate_phone,
};

/// Collision re-rolls before the transaction gives up on code generation
const MAX_CODE_ATTEMPTS: usize = 8;

/// Execute one booking attempt as a single atomic unit.
///
/// Validation failures return `Err` with a specific cause code; capacity
/// races return `Ok` with a `conflict` status so the dialogue engine can
/// offer to re-check availability. Store failures bubble as system errors
/// for the caller to turn into a callback.
pub async fn create_booking(
    pool: &SqlitePool,
    req: &CreateBookingRequest,
) -> AppResult<BookingResponse> {
    let restaurant = restaurant::find_by_id(pool, req.restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    // Per-field validation, each with its own cause code
    validate_customer_name(&req.customer.name)?;
    let phone = validate_phone(&req.customer.phone)?;
    validate_optional_email(&req.customer.email)?;
    validate_optional_text(&req.booking.special_requests, "Special requests", MAX_NOTE_LEN)?;
    validate_party_size(req.booking.party_size, restaurant.settings().max_party_size)?;
    if req.booking.time_slot_id.is_none() && req.booking.desired_time.is_none() {
        return Err(AppError::new(ErrorCode::MissingDatetime));
    }

    // Advisory slot resolution. Like an availability hit it can go stale;
    // the conditional update inside the transaction is what decides.
    let slot = match resolve_slot(pool, &restaurant, req).await? {
        Some(slot) => slot,
        None => {
            return Ok(conflict(
                ErrorCode::SlotUnavailable,
                "That time is not bookable anymore. Shall I check nearby times?",
            ));
        }
    };
    if slot.is_blocked {
        return Ok(conflict(
            ErrorCode::SlotUnavailable,
            "That time is not bookable anymore. Shall I check nearby times?",
        ));
    }
    if slot.available_capacity() < req.booking.party_size {
        return Ok(conflict(
            ErrorCode::InsufficientCapacity,
            "We no longer have room for that party size at that time.",
        ));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await.map_err(|e| AppError::database(e.to_string()))?;

    // 1. Try-acquire the seats. The WHERE clause re-checks capacity and
    //    blocking even though the pre-check passed, because the two are not
    //    atomic together: a concurrent booker that got here first makes
    //    this update match zero rows.
    let acquired =
        time_slot::try_acquire_capacity(&mut tx, slot.id, req.booking.party_size, now)
            .await
            .map_err(AppError::from)?;
    if !acquired {
        tx.rollback().await.map_err(|e| AppError::database(e.to_string()))?;
        return Ok(conflict(
            ErrorCode::SlotUnavailable,
            "That time was just taken. Shall I check nearby times?",
        ));
    }

    // 2. Customer upsert by phone fingerprint
    let customer_id = customer::upsert_tx(
        &mut tx,
        &CustomerUpsert {
            restaurant_id: restaurant.id,
            phone_fingerprint: phone_fingerprint(&phone),
            name: req.customer.name.trim().to_string(),
            email: req.customer.email.clone(),
            contact_consent: req.customer.contact_consent,
        },
        now,
    )
    .await
    .map_err(AppError::from)?;

    // 3. Confirmation code, collision-checked against live reservations
    let code = unique_code(&mut tx, restaurant.id).await?;

    // 4. Reservation insert; CONFIRMED status is what consumed the capacity
    let reservation_id = reservation::insert_confirmed_tx(
        &mut tx,
        &ReservationCreate {
            restaurant_id: restaurant.id,
            time_slot_id: slot.id,
            customer_id,
            call_record_id: req.call_record_id,
            party_size: req.booking.party_size,
            seating_area: slot.seating_area,
            special_requests: req.booking.special_requests.clone(),
        },
        &code,
        now,
    )
    .await
    .map_err(AppError::from)?;

    tx.commit().await.map_err(|e| AppError::database(e.to_string()))?;

    let tz = restaurant.tz();
    let when = millis_to_local(slot.start_time, tz).format("%H:%M on %A");
    tracing::info!(
        reservation_id,
        slot_id = slot.id,
        party_size = req.booking.party_size,
        "Booking confirmed ({code})"
    );

    Ok(BookingResponse {
        status: BookingStatus::Booked,
        reservation_id: Some(reservation_id),
        confirmation_code: Some(code.clone()),
        customer_id: Some(customer_id),
        error_code: None,
        message: format!(
            "Booked: table for {} {} at {when}. Your confirmation code is {code}.",
            req.booking.party_size,
            slot.seating_area.spoken_label(),
        ),
    })
}

/// Look up a reservation by its spoken confirmation code
pub async fn find_by_confirmation_code(
    pool: &SqlitePool,
    restaurant_id: i64,
    code: &str,
) -> AppResult<Reservation> {
    reservation::find_by_code(pool, restaurant_id, &code.trim().to_uppercase())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("No reservation with code {code}")))
}

async fn resolve_slot(
    pool: &SqlitePool,
    restaurant: &Restaurant,
    req: &CreateBookingRequest,
) -> AppResult<Option<TimeSlot>> {
    if let Some(slot_id) = req.booking.time_slot_id {
        let found = time_slot::find_by_id(pool, slot_id)
            .await
            .map_err(AppError::from)?;
        // 防跨租户引用
        return Ok(found.filter(|s| s.restaurant_id == restaurant.id));
    }

    // desired_time presence was validated up front
    let desired = req.booking.desired_time.unwrap_or_default();
    let grid_time = round_to_grid(desired, restaurant.tz());
    time_slot::find_best_at(
        pool,
        restaurant.id,
        grid_time,
        req.booking.seating_area,
        req.booking.party_size,
    )
    .await
    .map_err(AppError::from)
}

async fn unique_code(tx: &mut Transaction<'_, Sqlite>, restaurant_id: i64) -> AppResult<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = confirmation::generate_code();
        if !reservation::code_exists_tx(tx, restaurant_id, &code)
            .await
            .map_err(AppError::from)?
        {
            return Ok(code);
        }
    }
    Err(AppError::internal("Could not generate a unique confirmation code"))
}

fn conflict(code: ErrorCode, message: &str) -> BookingResponse {
    BookingResponse {
        status: BookingStatus::Conflict,
        reservation_id: None,
        confirmation_code: None,
        customer_id: None,
        error_code: Some(code),
        message: message.to_string(),
    }
}
