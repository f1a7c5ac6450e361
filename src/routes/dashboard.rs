//! Dashboard routes: statistics and the recent-activity feed.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::AppError;
use crate::middleware::rbac::RequireDashboard;
use crate::models::dashboard::{ActivityItem, DashboardStats};
use crate::services::dashboard;
use crate::AppState;

/// GET /dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireDashboard(_user): RequireDashboard,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = dashboard::get_dashboard_stats(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(stats))
}

/// GET /dashboard/recent-activity
pub async fn recent_activity(
    State(state): State<AppState>,
    RequireDashboard(_user): RequireDashboard,
) -> Result<Json<Vec<ActivityItem>>, AppError> {
    let activity = dashboard::get_recent_activity(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(activity))
}
