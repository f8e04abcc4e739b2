//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`availability`] - 可订性查询 (CheckAvailability)
//! - [`bookings`] - 预订创建与生命周期 (CreateBooking)
//! - [`calls`] - 通话结果日志 (LogCallOutcome)
//! - [`callbacks`] - 人工回拨队列 (Create/Resolve/ListPending)
//! - [`restaurants`] - 租户与整日封禁管理
//! - [`slots`] - 时段容量管理
//! - [`stats`] - 按日聚合只读视图

use axum::Router;

use crate::core::ServerState;

pub mod availability;
pub mod bookings;
pub mod callbacks;
pub mod calls;
pub mod health;
pub mod restaurants;
pub mod slots;
pub mod stats;

/// Merge every API area into one router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(availability::router())
        .merge(bookings::router())
        .merge(calls::router())
        .merge(callbacks::router())
        .merge(restaurants::router())
        .merge(slots::router())
        .merge(stats::router())
}
