//! Engine RPC response DTOs
//!
//! These shapes are the contract with the dialogue engine — it matches on
//! `status` / `error_code` verbatim to drive its scripted responses, never
//! on transport-level details.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::models::SeatingArea;

/// CheckAvailability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Exact requested slot can seat the party
    Available,
    /// No exact hit, but nearby alternatives exist
    PartialMatch,
    /// Nothing bookable around the requested time
    Unavailable,
}

/// A bookable slot offered to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotOption {
    pub time_slot_id: i64,
    /// Slot start, Unix millis UTC
    pub start_time: i64,
    pub seating_area: SeatingArea,
    pub available_capacity: i64,
}

/// CheckAvailability output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub status: AvailabilityStatus,
    /// Cause when status is `unavailable` (closed, outside hours, blocked…)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorCode>,
    /// The exact requested slot, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<SlotOption>,
    /// Up to 3 ranked alternatives on a partial match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<SlotOption>,
    /// Human-readable line suitable for direct use in a spoken response
    pub message: String,
}

/// CreateBooking verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Reservation confirmed and capacity consumed
    Booked,
    /// Slot vanished or capacity insufficient — re-run availability
    Conflict,
    /// Unexpected failure — create a callback, do not retry blindly
    Error,
}

/// CreateBooking output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    pub message: String,
}

/// CreateCallback output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackCreatedResponse {
    pub callback_id: i64,
    /// Assigned priority; lower = more urgent. Callers page staff on 1.
    pub priority: i64,
}

/// LogCallOutcome output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLoggedResponse {
    pub call_record_id: i64,
    /// False when the external call id had been logged before (fields merged)
    pub created: bool,
}
