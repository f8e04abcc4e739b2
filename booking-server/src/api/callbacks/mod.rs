//! Callbacks API 模块

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/callbacks", post(handler::create))
        .route("/api/callbacks/pending", get(handler::list_pending))
        .route("/api/callbacks/{id}/claim", post(handler::claim))
        .route("/api/callbacks/{id}/resolve", post(handler::resolve))
}
