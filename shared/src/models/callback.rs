//! Callback Model — 人工回拨队列

use serde::{Deserialize, Serialize};

use super::SeatingArea;

/// Why the booking could not complete synchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CallbackCause {
    /// Allergy or other safety concern raised on the call
    AllergySafety,
    /// Party above the large-party threshold, needs staff handling
    LargeParty,
    /// Engine or store failure mid-call
    SystemError,
    /// Store did not answer within the caller's latency bound
    SystemTimeout,
    /// Slot lost to a concurrent booking and no retry succeeded
    BookingConflict,
    /// No capacity anywhere near the requested time
    NoCapacity,
    /// Anything else staff should follow up on
    GeneralInquiry,
}

impl CallbackCause {
    /// Fixed cause→priority table; lower = more urgent.
    ///
    /// Safety outranks everything regardless of arrival order.
    pub fn priority(&self) -> i64 {
        match self {
            Self::AllergySafety => 1,
            Self::LargeParty => 2,
            Self::SystemError | Self::SystemTimeout => 3,
            Self::BookingConflict | Self::NoCapacity => 4,
            Self::GeneralInquiry => 5,
        }
    }
}

/// Callback workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CallbackStatus {
    Pending,
    InProgress,
    Resolved,
    Failed,
}

/// Callback entity — a deferred, staff-actioned booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Callback {
    pub id: i64,
    pub restaurant_id: i64,
    pub call_record_id: Option<i64>,
    /// Reservation that eventually resolved this callback, if any
    pub reservation_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: String,
    /// Requested booking parameters, carried for the staff dial-back
    pub requested_time: Option<i64>,
    pub party_size: Option<i64>,
    pub seating_area: Option<SeatingArea>,
    pub notes: Option<String>,
    pub cause: CallbackCause,
    pub priority: i64,
    pub status: CallbackStatus,
    pub claimed_by: Option<String>,
    pub resolved_by: Option<String>,
    pub resolution_outcome: Option<String>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create callback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackCreate {
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

/// Resolve callback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackResolve {
    pub resolved_by: String,
    pub outcome: String,
    pub notes: Option<String>,
    pub reservation_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_outranks_everything() {
        let causes = [
            CallbackCause::LargeParty,
            CallbackCause::SystemError,
            CallbackCause::SystemTimeout,
            CallbackCause::BookingConflict,
            CallbackCause::NoCapacity,
            CallbackCause::GeneralInquiry,
        ];
        for cause in causes {
            assert!(CallbackCause::AllergySafety.priority() < cause.priority());
        }
    }

    #[test]
    fn priority_ordering_matches_tiers() {
        assert!(CallbackCause::LargeParty.priority() < CallbackCause::SystemTimeout.priority());
        assert!(
            CallbackCause::SystemTimeout.priority() < CallbackCause::BookingConflict.priority()
        );
        assert!(
            CallbackCause::BookingConflict.priority() < CallbackCause::GeneralInquiry.priority()
        );
    }
}
