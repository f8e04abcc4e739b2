//! Restaurants API 模块

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants", post(handler::create))
        .route(
            "/api/restaurants/{id}",
            get(handler::get_by_id).put(handler::update),
        )
        .route(
            "/api/restaurants/{id}/blocks",
            post(handler::create_block).get(handler::list_blocks),
        )
}
