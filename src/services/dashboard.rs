//! Dashboard statistics and activity feed aggregation.
//!
//! Both entry points take the caller's `now` so a single request uses one
//! consistent reference time for the activity window and synthetic events.

use chrono::{DateTime, Duration, Utc};

use crate::errors::AppError;
use crate::models::dashboard::{ActivityItem, ActivityKind, DashboardStats, PercentChanges};
use crate::models::user::User;
use crate::store::UserStore;

/// Users created within this many days count as active.
pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Registrations pulled into the activity feed.
pub const RECENT_REGISTRATIONS: i64 = 5;

/// Maximum entries returned by the activity feed.
pub const MAX_ACTIVITY_ITEMS: usize = 10;

const STATS_ERROR: &str = "Failed to fetch dashboard statistics";
const ACTIVITY_ERROR: &str = "Failed to fetch recent activity";

// Placeholder financials until a payment/analytics source exists.
const TOTAL_REVENUE: f64 = 123_456.78;
const CONVERSION_RATE: f64 = 3.24;
const PERCENT_CHANGES: PercentChanges = PercentChanges {
    users: 12.5,
    revenue: 8.3,
    conversion_rate: -2.1,
};

/// Compute dashboard statistics as of `now`.
pub async fn get_dashboard_stats(
    store: &dyn UserStore,
    now: DateTime<Utc>,
) -> Result<DashboardStats, AppError> {
    let cutoff = now - Duration::days(ACTIVE_WINDOW_DAYS);

    let (total_users, active_users) = tokio::try_join!(
        store.count_users(),
        store.count_users_created_since(cutoff),
    )
    .map_err(AppError::aggregation(STATS_ERROR))?;

    tracing::debug!(total_users, active_users, %cutoff, "Computed dashboard stats");

    Ok(DashboardStats {
        total_users,
        active_users,
        total_revenue: TOTAL_REVENUE,
        conversion_rate: CONVERSION_RATE,
        percent_changes: PERCENT_CHANGES,
    })
}

/// Build the recent-activity feed as of `now`.
pub async fn get_recent_activity(
    store: &dyn UserStore,
    now: DateTime<Utc>,
) -> Result<Vec<ActivityItem>, AppError> {
    let users = store
        .recent_users(RECENT_REGISTRATIONS)
        .await
        .map_err(AppError::aggregation(ACTIVITY_ERROR))?;

    let registrations = users.iter().map(registration_activity).collect();
    Ok(merge_activity(registrations, synthetic_activity(now)))
}

fn registration_activity(user: &User) -> ActivityItem {
    ActivityItem {
        id: user.id.to_string(),
        kind: ActivityKind::UserRegistered,
        description: "New user registration".to_string(),
        timestamp: user.created_at,
        user: user.display_name().to_string(),
    }
}

/// Fixed demonstration events, offset from `now`.
pub fn synthetic_activity(now: DateTime<Utc>) -> Vec<ActivityItem> {
    [
        (
            "1000",
            ActivityKind::PaymentCompleted,
            "Payment processed successfully",
            15,
            "Bob Wilson",
        ),
        ("1001", ActivityKind::UserLogin, "User logged in", 30, "Alice Johnson"),
        ("1002", ActivityKind::DataExport, "Data export requested", 45, "Charlie Brown"),
    ]
    .into_iter()
    .map(|(id, kind, description, minutes_ago, user)| ActivityItem {
        id: id.to_string(),
        kind,
        description: description.to_string(),
        timestamp: now - Duration::minutes(minutes_ago),
        user: user.to_string(),
    })
    .collect()
}

/// Concatenate, sort newest first and cap at [`MAX_ACTIVITY_ITEMS`].
///
/// The sort is stable: on equal timestamps `primary` entries stay ahead of
/// `extra` ones and each keeps its input order.
pub fn merge_activity(primary: Vec<ActivityItem>, extra: Vec<ActivityItem>) -> Vec<ActivityItem> {
    let mut all = primary;
    all.extend(extra);
    all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    all.truncate(MAX_ACTIVITY_ITEMS);
    all
}
