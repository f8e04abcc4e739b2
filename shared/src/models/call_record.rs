//! Call Record Model — 通话日志

use serde::{Deserialize, Serialize};

/// Final status of a phone call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CallStatus {
    InProgress,
    Completed,
    Failed,
    Abandoned,
}

/// What the call produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CallOutcome {
    BookingMade,
    CallbackCreated,
    InfoProvided,
    NoAction,
}

/// Call record entity, keyed by the voice platform's call id
///
/// `LogCallOutcome` is idempotent on (restaurant, external_call_id):
/// re-logging the same call merges newer non-null fields into the one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CallRecord {
    pub id: i64,
    pub restaurant_id: i64,
    pub external_call_id: String,
    pub caller_phone: Option<String>,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub status: Option<CallStatus>,
    pub outcome: Option<CallOutcome>,
    pub safety_flag: bool,
    pub transcript_ref: Option<String>,
    pub recording_ref: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// LogCallOutcome payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOutcomeLog {
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
