//! Bookings API 模块

mod handler;

use axum::{Router, routing::{get, post, put}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/bookings", post(handler::create))
        .route("/api/bookings/{id}", get(handler::get_by_id))
        .route("/api/bookings/{id}/status", put(handler::update_status))
        .route("/api/bookings/code/{code}", get(handler::get_by_code))
}
