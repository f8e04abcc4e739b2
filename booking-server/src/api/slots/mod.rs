//! Slots API 模块

mod handler;

use axum::{Router, routing::{get, post, put}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/slots", post(handler::create))
        .route("/api/slots/{id}", get(handler::get_by_id))
        .route("/api/slots/{id}/block", put(handler::set_blocked))
}
