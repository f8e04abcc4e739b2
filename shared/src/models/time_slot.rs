//! Time Slot Model — 容量账本的最小单位

use serde::{Deserialize, Serialize};

/// Seating area category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SeatingArea {
    Indoor,
    Outdoor,
    Bar,
    Private,
}

impl SeatingArea {
    /// Wire/database name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indoor => "INDOOR",
            Self::Outdoor => "OUTDOOR",
            Self::Bar => "BAR",
            Self::Private => "PRIVATE",
        }
    }

    /// Phrase used in spoken confirmation messages
    pub fn spoken_label(&self) -> &'static str {
        match self {
            Self::Indoor => "indoors",
            Self::Outdoor => "on the terrace",
            Self::Bar => "at the bar",
            Self::Private => "in the private room",
        }
    }
}

/// Bookable (time, seating area) unit with finite capacity
///
/// Invariant: `0 <= booked_capacity <= total_capacity`, and available
/// capacity is always derived from the two counters, never stored.
/// At most one slot exists per (restaurant, start_time, seating_area).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeSlot {
    pub id: i64,
    pub restaurant_id: i64,
    /// Slot start, Unix millis UTC, always on the 30-minute grid
    pub start_time: i64,
    pub seating_area: SeatingArea,
    pub total_capacity: i64,
    pub booked_capacity: i64,
    /// Manually blocked (special event, maintenance) — hidden from search
    pub is_blocked: bool,
    pub block_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TimeSlot {
    /// Derived available capacity — computed, never cached
    pub fn available_capacity(&self) -> i64 {
        (self.total_capacity - self.booked_capacity).max(0)
    }

    /// Can this slot seat the party right now?
    pub fn can_seat(&self, party_size: i64) -> bool {
        !self.is_blocked && self.available_capacity() >= party_size
    }
}

/// Create time slot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotCreate {
    pub restaurant_id: i64,
    pub start_time: i64,
    pub seating_area: SeatingArea,
    pub total_capacity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(total: i64, booked: i64, blocked: bool) -> TimeSlot {
        TimeSlot {
            id: 1,
            restaurant_id: 1,
            start_time: 0,
            seating_area: SeatingArea::Indoor,
            total_capacity: total,
            booked_capacity: booked,
            is_blocked: blocked,
            block_reason: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn available_is_derived_and_never_negative() {
        assert_eq!(slot(6, 2, false).available_capacity(), 4);
        assert_eq!(slot(4, 4, false).available_capacity(), 0);
        // booked > total 时取 0
        assert_eq!(slot(4, 5, false).available_capacity(), 0);
    }

    #[test]
    fn blocked_slot_cannot_seat() {
        assert!(slot(6, 0, false).can_seat(4));
        assert!(!slot(6, 0, true).can_seat(4));
        assert!(!slot(6, 4, false).can_seat(3));
    }
}
