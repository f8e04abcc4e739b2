//! Restaurant Model (tenant root)

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Opening hours for one weekday, "HH:MM" local time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

/// Weekly opening hours; a missing day means closed
///
/// Stored as a JSON column on the restaurant row — see
/// [`Restaurant::hours`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mon: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tue: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wed: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thu: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fri: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sun: Option<DayHours>,
}

impl WeeklyHours {
    /// Hours for a weekday; `None` = closed that day
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Mon => self.mon.as_ref(),
            Weekday::Tue => self.tue.as_ref(),
            Weekday::Wed => self.wed.as_ref(),
            Weekday::Thu => self.thu.as_ref(),
            Weekday::Fri => self.fri.as_ref(),
            Weekday::Sat => self.sat.as_ref(),
            Weekday::Sun => self.sun.as_ref(),
        }
    }
}

/// Per-restaurant booking policy, read from named columns
///
/// Typed view over the settings the engine actually consumes — no
/// open-ended settings bag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RestaurantSettings {
    /// Largest party bookable by phone
    pub max_party_size: i64,
    /// At or above this size, callers route the party to the callback queue
    pub large_party_threshold: i64,
    /// Minutes before close after which no seating starts
    pub last_seating_offset_min: i64,
    /// How many days ahead bookings are accepted
    pub booking_horizon_days: i64,
}

/// Restaurant entity (租户根)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// IANA timezone name, e.g. "Europe/Madrid"
    pub timezone: String,
    /// JSON-encoded [`WeeklyHours`]
    pub weekly_hours: String,
    pub max_party_size: i64,
    pub large_party_threshold: i64,
    pub last_seating_offset_min: i64,
    pub booking_horizon_days: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    /// Tenant timezone; unparseable names fall back to UTC with a warning
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Restaurant {} has invalid timezone '{}', falling back to UTC",
                self.id,
                self.timezone
            );
            chrono_tz::UTC
        })
    }

    /// Parsed weekly hours; malformed JSON reads as closed-all-week
    pub fn hours(&self) -> WeeklyHours {
        serde_json::from_str(&self.weekly_hours).unwrap_or_else(|e| {
            tracing::warn!(
                "Restaurant {} has malformed weekly_hours: {}",
                self.id,
                e
            );
            WeeklyHours::default()
        })
    }

    /// Booking policy view
    pub fn settings(&self) -> RestaurantSettings {
        RestaurantSettings {
            max_party_size: self.max_party_size,
            large_party_threshold: self.large_party_threshold,
            last_seating_offset_min: self.last_seating_offset_min,
            booking_horizon_days: self.booking_horizon_days,
        }
    }
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub timezone: String,
    pub weekly_hours: WeeklyHours,
    pub max_party_size: Option<i64>,
    pub large_party_threshold: Option<i64>,
    pub last_seating_offset_min: Option<i64>,
    pub booking_horizon_days: Option<i64>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub weekly_hours: Option<WeeklyHours>,
    pub max_party_size: Option<i64>,
    pub large_party_threshold: Option<i64>,
    pub last_seating_offset_min: Option<i64>,
    pub booking_horizon_days: Option<i64>,
    pub is_active: Option<bool>,
}

/// Date-level closure or private event
///
/// A blocked date removes the whole day from availability regardless of
/// slot capacity; `reason` is the public-facing explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DateBlock {
    pub id: i64,
    pub restaurant_id: i64,
    /// YYYY-MM-DD in the restaurant's timezone
    pub block_date: String,
    pub reason: String,
    pub created_at: i64,
}

/// Create date block payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateBlockCreate {
    pub restaurant_id: i64,
    pub block_date: String,
    pub reason: String,
}
