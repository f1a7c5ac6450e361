//! Dashboard tools.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::ToolDescriptor;
use crate::errors::AppError;
use crate::services::dashboard;
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTool {
    GetStats,
    GetRecentActivity,
}

impl DashboardTool {
    pub const ALL: [Self; 2] = [Self::GetStats, Self::GetRecentActivity];

    pub fn id(self) -> &'static str {
        match self {
            Self::GetStats => "dashboard_get_stats",
            Self::GetRecentActivity => "dashboard_get_recent_activity",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.id() == id)
    }

    pub fn descriptor(self) -> ToolDescriptor {
        let (name, description) = match self {
            Self::GetStats => (
                "Get Dashboard Statistics",
                "Get dashboard statistics including total users, active users, revenue, and conversion metrics",
            ),
            Self::GetRecentActivity => (
                "Get Recent Activity",
                "Get recent activity feed showing system activities and events",
            ),
        };
        ToolDescriptor {
            id: self.id(),
            name,
            description,
        }
    }

    /// Run the tool and return its JSON output.
    pub async fn invoke(
        self,
        store: &dyn UserStore,
        now: DateTime<Utc>,
    ) -> Result<Value, AppError> {
        let output = match self {
            Self::GetStats => {
                serde_json::to_value(dashboard::get_dashboard_stats(store, now).await?)
            }
            Self::GetRecentActivity => {
                let activities = dashboard::get_recent_activity(store, now).await?;
                Ok(json!({ "activities": activities }))
            }
        };
        output.map_err(|e| AppError::Internal(format!("Tool output serialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryUserStore;

    #[test]
    fn ids_round_trip() {
        for tool in DashboardTool::ALL {
            assert_eq!(DashboardTool::from_id(tool.id()), Some(tool));
        }
        assert_eq!(DashboardTool::from_id("dashboard_delete_everything"), None);
    }

    #[tokio::test]
    async fn stats_tool_returns_stats_object() {
        let out = DashboardTool::GetStats
            .invoke(&MemoryUserStore::new(), Utc::now())
            .await
            .unwrap();
        assert_eq!(out["totalUsers"], 0);
        assert!(out["percentChanges"].is_object());
    }

    #[tokio::test]
    async fn activity_tool_wraps_feed() {
        let out = DashboardTool::GetRecentActivity
            .invoke(&MemoryUserStore::new(), Utc::now())
            .await
            .unwrap();
        assert_eq!(out["activities"].as_array().unwrap().len(), 3);
    }
}
