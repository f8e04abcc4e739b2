//! Restaurants API Handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use shared::models::{DateBlock, DateBlockCreate, Restaurant, RestaurantCreate, RestaurantUpdate};

use crate::core::ServerState;
use crate::db::repository::{date_block, restaurant};
use crate::utils::{AppError, AppResult};

/// POST /api/restaurants - 创建租户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    let created = restaurant::create(&state.db, payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(created))
}

/// GET /api/restaurants/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let found = restaurant::find_by_id(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    Ok(Json(found))
}

/// PUT /api/restaurants/:id - 更新营业时间/预订策略
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let updated = restaurant::update(&state.db, id, payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct BlockPayload {
    pub block_date: String,
    pub reason: String,
}

/// POST /api/restaurants/:id/blocks - 整日封禁 (闭店、包场)
pub async fn create_block(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BlockPayload>,
) -> AppResult<Json<DateBlock>> {
    let created = date_block::create(
        &state.db,
        DateBlockCreate {
            restaurant_id: id,
            block_date: payload.block_date,
            reason: payload.reason,
        },
    )
    .await
    .map_err(AppError::from)?;
    Ok(Json(created))
}

/// GET /api/restaurants/:id/blocks
pub async fn list_blocks(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<DateBlock>>> {
    let blocks = date_block::find_upcoming(&state.db, id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(blocks))
}
