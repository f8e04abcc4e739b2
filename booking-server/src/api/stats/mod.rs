//! Stats API 模块 — 仪表盘只读视图

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stats/daily", get(handler::daily))
}
