//! Dashboard statistics and activity feed DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary statistics for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_users: i64,
    pub total_revenue: f64,
    pub conversion_rate: f64,
    pub percent_changes: PercentChanges,
}

/// Period-over-period change, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentChanges {
    pub users: f64,
    pub revenue: f64,
    pub conversion_rate: f64,
}

/// Tag identifying what kind of event an activity item records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserRegistered,
    PaymentCompleted,
    UserLogin,
    DataExport,
    #[serde(other)]
    Unknown,
}

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2025-11-12T10:15:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(d)
    }
}
