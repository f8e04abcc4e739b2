//! Engine RPC request DTOs
//!
//! The dialogue engine extracts these from conversation and posts them to
//! the HTTP surface. All timestamps are Unix millis UTC; the engine does
//! tenant-timezone interpretation internally.

use serde::{Deserialize, Serialize};

use crate::models::{CallOutcome, CallStatus, CallbackCause, SeatingArea};

/// CheckAvailability input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAvailabilityRequest {
    pub restaurant_id: i64,
    /// Desired seating time, Unix millis UTC
    pub desired_time: i64,
    pub party_size: i64,
    /// `None` = any seating area
    pub seating_preference: Option<SeatingArea>,
}

/// Customer fields on a booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub contact_consent: bool,
}

/// Booking fields on a booking request
///
/// Either `time_slot_id` (from a prior availability hit) or `desired_time`
/// must be supplied; capacity is re-verified either way, because the two
/// calls are not atomic together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub time_slot_id: Option<i64>,
    pub desired_time: Option<i64>,
    pub party_size: i64,
    pub seating_area: Option<SeatingArea>,
    pub special_requests: Option<String>,
}

/// CreateBooking input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub restaurant_id: i64,
    pub call_record_id: Option<i64>,
    pub customer: BookingCustomer,
    pub booking: BookingDetails,
}

/// LogCallOutcome input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogCallOutcomeRequest {
    pub restaurant_id: i64,
    pub external_call_id: String,
    pub caller_phone: Option<String>,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub status: Option<CallStatus>,
    pub outcome: Option<CallOutcome>,
    #[serde(default)]
    pub safety_flag: bool,
    pub transcript_ref: Option<String>,
    pub recording_ref: Option<String>,
}

/// CreateCallback input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallbackRequest {
    pub restaurant_id: i64,
    pub call_record_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: String,
    pub requested_time: Option<i64>,
    pub party_size: Option<i64>,
    pub seating_area: Option<SeatingArea>,
    pub notes: Option<String>,
    pub cause: CallbackCause,
}

/// ResolveCallback input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveCallbackRequest {
    pub resolved_by: String,
    pub outcome: String,
    pub notes: Option<String>,
    pub reservation_id: Option<i64>,
}
