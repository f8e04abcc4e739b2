//! Reservation Model

use serde::{Deserialize, Serialize};

use super::SeatingArea;

/// Reservation lifecycle status
///
/// `CONFIRMED → SEATED → COMPLETED`, or `CONFIRMED → CANCELLED / NO_SHOW`.
/// Status transitions are the only way a slot's booked capacity changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReservationStatus {
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Does a reservation in this status hold slot capacity?
    ///
    /// Ledger invariant: a slot's booked_capacity equals the party sizes of
    /// its CONFIRMED and SEATED reservations, nothing else.
    pub fn holds_capacity(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Seated)
    }

    /// Allowed next statuses
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Confirmed, Seated)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (Seated, Completed)
                | (Cancelled, Confirmed)
        )
    }
}

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub restaurant_id: i64,
    pub time_slot_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub call_record_id: Option<i64>,
    /// Short speakable code, unique per restaurant
    pub confirmation_code: String,
    pub party_size: i64,
    pub seating_area: SeatingArea,
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert payload used inside the booking transaction
#[derive(Debug, Clone)]
pub struct ReservationCreate {
    pub restaurant_id: i64,
    pub time_slot_id: i64,
    pub customer_id: i64,
    pub call_record_id: Option<i64>,
    pub party_size: i64,
    pub seating_area: SeatingArea,
    pub special_requests: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_holding_statuses() {
        assert!(ReservationStatus::Confirmed.holds_capacity());
        assert!(ReservationStatus::Seated.holds_capacity());
        assert!(!ReservationStatus::Completed.holds_capacity());
        assert!(!ReservationStatus::Cancelled.holds_capacity());
        assert!(!ReservationStatus::NoShow.holds_capacity());
    }

    #[test]
    fn lifecycle_transitions() {
        use ReservationStatus::*;
        assert!(Confirmed.can_transition_to(Seated));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(Seated.can_transition_to(Completed));
        // 取消后可重新确认 (re-book)
        assert!(Cancelled.can_transition_to(Confirmed));
        // 终态不可回退
        assert!(!Completed.can_transition_to(Confirmed));
        assert!(!NoShow.can_transition_to(Confirmed));
        assert!(!Seated.can_transition_to(Cancelled));
    }
}
