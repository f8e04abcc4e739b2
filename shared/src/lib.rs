//! Shared types for the booking engine
//!
//! # 内容
//!
//! - [`models`] - 领域模型 (Restaurant / TimeSlot / Reservation / Customer / Callback)
//! - [`error`] - 统一错误类型和错误码
//! - [`request`] / [`response`] - 引擎 RPC 请求/响应 DTO
//! - [`util`] - 时间戳、ID 生成、电话号码指纹
//!
//! Database derives (`sqlx::FromRow` / `sqlx::Type`) are gated behind the
//! `db` feature so non-server consumers can use the models without sqlx.

pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-export 公共类型
pub use error::{AppError, AppResult, ErrorCode};
