//! Stats API Handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use shared::models::DailyStats;

use crate::core::ServerState;
use crate::db::repository::daily_stats;
use crate::utils::{AppError, AppResult, time};

#[derive(Deserialize)]
pub struct DailyQuery {
    pub restaurant_id: i64,
    /// YYYY-MM-DD, inclusive
    pub from: String,
    /// YYYY-MM-DD, inclusive
    pub to: String,
}

/// GET /api/stats/daily - 按日聚合 (只读)
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<Vec<DailyStats>>> {
    time::parse_date(&query.from)?;
    time::parse_date(&query.to)?;

    let rows = daily_stats::find_range(&state.db, query.restaurant_id, &query.from, &query.to)
        .await
        .map_err(AppError::from)?;
    Ok(Json(rows))
}
