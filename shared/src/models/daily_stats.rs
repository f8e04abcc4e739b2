//! Daily Stats Model — 按日聚合计数

use serde::{Deserialize, Serialize};

/// One row per (restaurant, calendar date); counters only ever increment
///
/// The per-hour histogram is a JSON array of 24 counters updated in place
/// by the upsert statement — see the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyStats {
    pub restaurant_id: i64,
    /// YYYY-MM-DD in the restaurant's timezone
    pub stat_date: String,
    pub total_calls: i64,
    pub completed_calls: i64,
    pub failed_calls: i64,
    pub bookings_made: i64,
    pub callbacks_created: i64,
    pub safety_triggers: i64,
    /// JSON-encoded [i64; 24], calls by local hour of day
    pub hour_histogram: String,
    pub updated_at: i64,
}

impl DailyStats {
    /// Parsed histogram; malformed JSON reads as all zeros
    pub fn histogram(&self) -> [i64; 24] {
        serde_json::from_str::<Vec<i64>>(&self.hour_histogram)
            .ok()
            .and_then(|v| v.try_into().ok())
            .unwrap_or([0; 24])
    }
}

/// Increment set applied by one call-outcome log event
///
/// Every field is an amount to add; the repository folds the whole delta
/// into a single upsert-and-increment statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsDelta {
    pub calls: i64,
    pub completed_calls: i64,
    pub failed_calls: i64,
    pub bookings_made: i64,
    pub callbacks_created: i64,
    pub safety_triggers: i64,
    /// Local hour (0–23) whose histogram bucket gets +1, if any
    pub call_hour: Option<u32>,
}
