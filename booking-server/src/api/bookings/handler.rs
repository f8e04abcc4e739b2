//! Bookings API Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Reservation, ReservationStatus};
use shared::request::CreateBookingRequest;
use shared::response::{BookingResponse, BookingStatus};

use crate::booking;
use crate::core::ServerState;
use crate::db::repository::reservation;
use crate::utils::{AppError, AppResult};

/// POST /api/bookings - 创建预订 (原子事务)
///
/// Validation failures come back as a 400 envelope with a per-field cause;
/// capacity races come back 200 with `status = "conflict"`; store failures
/// come back 500 with `status = "error"` so the dialogue engine opens a
/// callback instead of retrying.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    match booking::create_booking(&state.db, &payload).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(err)
            if matches!(err.code, ErrorCode::InternalError | ErrorCode::DatabaseError) =>
        {
            tracing::error!("Booking transaction failed: {err}");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BookingResponse {
                    status: BookingStatus::Error,
                    reservation_id: None,
                    confirmation_code: None,
                    customer_id: None,
                    error_code: Some(ErrorCode::InternalError),
                    message: ErrorCode::InternalError.default_message().to_string(),
                }),
            ))
        }
        Err(err) => Err(err),
    }
}

/// GET /api/bookings/:id - 查询预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let found = reservation::find_by_id(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
    Ok(Json(found))
}

#[derive(Deserialize)]
pub struct CodeQuery {
    pub restaurant_id: i64,
}

/// GET /api/bookings/code/:code - 按确认码查询
pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Query(query): Query<CodeQuery>,
) -> AppResult<Json<Reservation>> {
    let found =
        booking::transaction::find_by_confirmation_code(&state.db, query.restaurant_id, &code)
            .await?;
    Ok(Json(found))
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
}

/// PUT /api/bookings/:id/status - 生命周期状态转移
///
/// 容量增减和状态变更在同一事务内完成
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Reservation>> {
    let updated = reservation::update_status(&state.db, id, payload.status)
        .await
        .map_err(AppError::from)?;
    Ok(Json(updated))
}
