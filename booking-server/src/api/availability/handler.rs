//! Availability API Handlers

use axum::{Json, extract::State};
use shared::request::CheckAvailabilityRequest;
use shared::response::AvailabilityResponse;

use crate::booking;
use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/availability/check - 查询可订性
///
/// Read-only; safe to call repeatedly during a conversation.
pub async fn check(
    State(state): State<ServerState>,
    Json(payload): Json<CheckAvailabilityRequest>,
) -> AppResult<Json<AvailabilityResponse>> {
    let response = booking::check_availability(&state.db, &payload).await?;
    Ok(Json(response))
}
