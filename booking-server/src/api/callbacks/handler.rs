//! Callbacks API Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Callback, CallbackCreate, CallbackResolve};
use shared::request::{CreateCallbackRequest, ResolveCallbackRequest};
use shared::response::CallbackCreatedResponse;

use crate::core::ServerState;
use crate::db::repository::{RepoError, callback, restaurant};
use crate::utils::{AppError, AppResult, validation};

/// POST /api/callbacks - 创建人工回拨
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateCallbackRequest>,
) -> AppResult<Json<CallbackCreatedResponse>> {
    restaurant::find_by_id(&state.db, payload.restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let phone = validation::validate_phone(&payload.customer_phone)?;

    let created = callback::create(
        &state.db,
        CallbackCreate {
            restaurant_id: payload.restaurant_id,
            call_record_id: payload.call_record_id,
            customer_name: payload.customer_name,
            customer_phone: phone,
            requested_time: payload.requested_time,
            party_size: payload.party_size,
            seating_area: payload.seating_area,
            notes: payload.notes,
            cause: payload.cause,
        },
    )
    .await
    .map_err(AppError::from)?;

    tracing::info!(
        callback_id = created.id,
        priority = created.priority,
        cause = ?created.cause,
        "Callback queued"
    );

    Ok(Json(CallbackCreatedResponse {
        callback_id: created.id,
        priority: created.priority,
    }))
}

#[derive(Deserialize)]
pub struct PendingQuery {
    pub restaurant_id: i64,
    pub limit: Option<i64>,
}

/// GET /api/callbacks/pending - 按优先级+时间排序的待办列表
pub async fn list_pending(
    State(state): State<ServerState>,
    Query(query): Query<PendingQuery>,
) -> AppResult<Json<Vec<Callback>>> {
    restaurant::find_by_id(&state.db, query.restaurant_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let items = callback::list_pending(
        &state.db,
        query.restaurant_id,
        query.limit.unwrap_or(50).clamp(1, 200),
    )
    .await
    .map_err(AppError::from)?;
    Ok(Json(items))
}

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub staff: String,
}

/// POST /api/callbacks/:id/claim - 认领 (PENDING → IN_PROGRESS)
pub async fn claim(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClaimRequest>,
) -> AppResult<Json<Callback>> {
    let claimed = callback::claim(&state.db, id, &payload.staff)
        .await
        .map_err(map_callback_error)?;
    Ok(Json(claimed))
}

/// POST /api/callbacks/:id/resolve - 结单；重复结单被拒
pub async fn resolve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ResolveCallbackRequest>,
) -> AppResult<Json<Callback>> {
    let resolved = callback::resolve(
        &state.db,
        id,
        CallbackResolve {
            resolved_by: payload.resolved_by,
            outcome: payload.outcome,
            notes: payload.notes,
            reservation_id: payload.reservation_id,
        },
    )
    .await
    .map_err(map_callback_error)?;
    Ok(Json(resolved))
}

/// Queue lookups get their own cause codes
fn map_callback_error(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::CallbackNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyResolved, msg),
        other => AppError::from(other),
    }
}
