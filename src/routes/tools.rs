//! Tool routes: list and invoke dashboard tools.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::errors::AppError;
use crate::middleware::rbac::RequireDashboard;
use crate::tools::dashboard::DashboardTool;
use crate::tools::ToolDescriptor;
use crate::AppState;

/// GET /tools
pub async fn list(RequireDashboard(_user): RequireDashboard) -> Json<Vec<ToolDescriptor>> {
    Json(DashboardTool::ALL.into_iter().map(DashboardTool::descriptor).collect())
}

/// POST /tools/{id}
pub async fn invoke(
    State(state): State<AppState>,
    RequireDashboard(user): RequireDashboard,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let tool = DashboardTool::from_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown tool: {id}")))?;
    tracing::info!(user_id = user.id, tool = tool.id(), "Invoking tool");
    let output = tool.invoke(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(output))
}
