//! Error codes for the booking engine RPC surface
//!
//! Codes are organized by category:
//! - General / validation
//! - Availability (CheckAvailability causes)
//! - Booking (CreateBooking causes)
//! - Tenant / call log / callback
//! - System errors
//!
//! Serialized as SCREAMING_SNAKE_CASE strings — the dialogue engine matches
//! on these verbatim to pick its scripted response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable cause code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ==================== General ====================
    /// Validation failed (generic; prefer a specific code)
    ValidationFailed,
    /// Resource not found
    NotFound,
    /// Resource already exists
    AlreadyExists,
    /// Invalid request
    InvalidRequest,

    // ==================== Availability ====================
    /// Party size outside the bookable range
    InvalidPartySize,
    /// Requested time is not in the future
    InvalidDate,
    /// Requested time is beyond the booking horizon
    DateTooFar,
    /// Restaurant is closed that day
    RestaurantClosed,
    /// Requested time is outside opening hours / past last seating
    OutsideHours,
    /// Date is blocked (private event, closure)
    DateBlocked,

    // ==================== Booking ====================
    /// Customer name missing
    MissingName,
    /// Customer phone missing
    MissingPhone,
    /// Phone fails the canonical numeric pattern
    InvalidPhone,
    /// Neither slot id nor desired time supplied
    MissingDatetime,
    /// Target slot vanished, is blocked, or was taken concurrently
    SlotUnavailable,
    /// Slot exists but cannot seat the party
    InsufficientCapacity,

    // ==================== Tenant ====================
    /// Restaurant id does not resolve
    RestaurantNotFound,

    // ==================== Call log ====================
    /// External call id missing or empty
    MissingCallId,

    // ==================== Callback ====================
    /// Callback id does not resolve
    CallbackNotFound,
    /// Callback already resolved
    AlreadyResolved,

    // ==================== System ====================
    /// Unexpected failure; caller should create a callback, not retry
    InternalError,
    /// Store-level failure
    DatabaseError,
}

impl ErrorCode {
    /// Stable wire name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidPartySize => "INVALID_PARTY_SIZE",
            Self::InvalidDate => "INVALID_DATE",
            Self::DateTooFar => "DATE_TOO_FAR",
            Self::RestaurantClosed => "RESTAURANT_CLOSED",
            Self::OutsideHours => "OUTSIDE_HOURS",
            Self::DateBlocked => "DATE_BLOCKED",
            Self::MissingName => "MISSING_NAME",
            Self::MissingPhone => "MISSING_PHONE",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::MissingDatetime => "MISSING_DATETIME",
            Self::SlotUnavailable => "SLOT_UNAVAILABLE",
            Self::InsufficientCapacity => "INSUFFICIENT_CAPACITY",
            Self::RestaurantNotFound => "RESTAURANT_NOT_FOUND",
            Self::MissingCallId => "MISSING_CALL_ID",
            Self::CallbackNotFound => "CALLBACK_NOT_FOUND",
            Self::AlreadyResolved => "ALREADY_RESOLVED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Default human-readable message, safe to speak to a caller
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "The request could not be validated",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidPartySize => "That party size is outside what we can book by phone",
            Self::InvalidDate => "The requested time has already passed",
            Self::DateTooFar => "That date is further ahead than we take bookings",
            Self::RestaurantClosed => "The restaurant is closed on that day",
            Self::OutsideHours => "That time is outside our seating hours",
            Self::DateBlocked => "That date is unavailable",
            Self::MissingName => "A name is needed to hold the booking",
            Self::MissingPhone => "A contact phone number is needed to hold the booking",
            Self::InvalidPhone => "The phone number does not look valid",
            Self::MissingDatetime => "A booking time is required",
            Self::SlotUnavailable => "That time was just taken",
            Self::InsufficientCapacity => "We cannot seat a party of that size at that time",
            Self::RestaurantNotFound => "Unknown restaurant",
            Self::MissingCallId => "Call id is required",
            Self::CallbackNotFound => "Callback not found",
            Self::AlreadyResolved => "Callback was already resolved",
            Self::InternalError => "Something went wrong on our side",
            Self::DatabaseError => "Something went wrong on our side",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
