//! Permission-based access control extractors for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::config::roles::{Permission, RoleRights};
use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::AppState;

/// Reject `user` unless its role is granted `permission`.
pub fn authorize(
    user: &CurrentUser,
    rights: &RoleRights,
    permission: Permission,
) -> Result<(), AppError> {
    if rights.allows(user.role, permission) {
        return Ok(());
    }
    tracing::warn!(user_id = user.id, ?permission, "Permission denied");
    Err(AppError::Forbidden(format!(
        "Missing permission: {}",
        serde_json::to_string(&permission)
            .unwrap_or_default()
            .trim_matches('"')
    )))
}

/// Extractor that requires the `getDashboard` permission.
#[derive(Debug, Clone)]
pub struct RequireDashboard(pub CurrentUser);

impl FromRequestParts<AppState> for RequireDashboard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        authorize(&user, &state.rights, Permission::GetDashboard)?;
        Ok(RequireDashboard(user))
    }
}
