//! Calls API Handlers

use axum::{Json, extract::State};
use shared::error::ErrorCode;
use shared::models::CallOutcomeLog;
use shared::request::LogCallOutcomeRequest;
use shared::response::CallLoggedResponse;

use crate::core::ServerState;
use crate::db::repository::{call_record, restaurant};
use crate::utils::{AppError, AppResult};

/// POST /api/calls/outcome - 记录通话结果
///
/// Idempotent on (restaurant, external_call_id); the daily aggregate moves
/// in the same transaction as the log row.
pub async fn log_outcome(
    State(state): State<ServerState>,
    Json(payload): Json<LogCallOutcomeRequest>,
) -> AppResult<Json<CallLoggedResponse>> {
    if payload.external_call_id.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MissingCallId));
    }

    let restaurant = restaurant::find_by_id(&state.db, payload.restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let log = CallOutcomeLog {
        restaurant_id: payload.restaurant_id,
        external_call_id: payload.external_call_id,
        caller_phone: payload.caller_phone,
        started_at: payload.started_at,
        ended_at: payload.ended_at,
        status: payload.status,
        outcome: payload.outcome,
        safety_flag: payload.safety_flag,
        transcript_ref: payload.transcript_ref,
        recording_ref: payload.recording_ref,
    };

    let (record, created) = call_record::log_outcome(&state.db, restaurant.tz(), log)
        .await
        .map_err(AppError::from)?;

    Ok(Json(CallLoggedResponse {
        call_record_id: record.id,
        created,
    }))
}
