//! Booking engine core
//!
//! - [`hours`] - 营业时间解析与最后入座截止
//! - [`availability`] - read-only slot search (exact + ±2h alternatives)
//! - [`transaction`] - the atomic booking transaction
//! - [`confirmation`] - speakable confirmation codes

pub mod availability;
pub mod confirmation;
pub mod hours;
pub mod transaction;

pub use availability::check_availability;
pub use transaction::create_booking;
