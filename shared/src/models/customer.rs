//! Customer Model (电话客户档案)

use serde::{Deserialize, Serialize};

/// Customer entity, keyed internally by phone fingerprint
///
/// Exactly one row exists per (restaurant, fingerprint) — enforced by a
/// uniqueness constraint, not check-then-insert. The raw phone number never
/// lands on this table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub restaurant_id: i64,
    /// Hex SHA-256 of the canonical phone number
    pub phone_fingerprint: String,
    pub name: String,
    pub email: Option<String>,
    pub contact_consent: bool,
    pub visit_count: i64,
    pub no_show_count: i64,
    pub is_vip: bool,
    pub last_visit_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload — created on first sighting, merged on return visits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpsert {
    pub restaurant_id: i64,
    pub phone_fingerprint: String,
    pub name: String,
    pub email: Option<String>,
    pub contact_consent: bool,
}
