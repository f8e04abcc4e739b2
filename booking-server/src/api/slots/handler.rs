//! Slots API Handlers — 容量账本维护

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use shared::models::{TimeSlot, TimeSlotCreate};

use crate::core::ServerState;
use crate::db::repository::time_slot;
use crate::utils::{AppError, AppResult};

/// POST /api/slots - 创建时段
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TimeSlotCreate>,
) -> AppResult<Json<TimeSlot>> {
    let created = time_slot::create(&state.db, payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(created))
}

/// GET /api/slots/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TimeSlot>> {
    let found = time_slot::find_by_id(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Time slot {id} not found")))?;
    Ok(Json(found))
}

#[derive(Deserialize)]
pub struct BlockPayload {
    pub blocked: bool,
    pub reason: Option<String>,
}

/// PUT /api/slots/:id/block - 手动封禁/解禁 (包场、维护)
pub async fn set_blocked(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BlockPayload>,
) -> AppResult<Json<TimeSlot>> {
    let updated = time_slot::set_blocked(&state.db, id, payload.blocked, payload.reason)
        .await
        .map_err(AppError::from)?;
    Ok(Json(updated))
}
