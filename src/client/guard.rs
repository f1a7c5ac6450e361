//! Route gating for pages that need a signed-in user.

use super::session::SessionStore;
use super::storage::AuthStorage;

pub mod routes {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const DASHBOARD: &str = "/dashboard";
    pub const PROFILE: &str = "/profile";
    pub const SETTINGS: &str = "/settings";
}

/// What a protected page should do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Hydration has not finished; render nothing yet.
    Loading,
    /// Send the user to `to`, remembering where they were headed.
    Redirect { to: &'static str, from: String },
    Render,
}

pub fn guard<S: AuthStorage>(session: &SessionStore<S>, location: &str) -> GuardOutcome {
    if session.is_loading() {
        return GuardOutcome::Loading;
    }
    if !session.is_authenticated() {
        return GuardOutcome::Redirect {
            to: routes::LOGIN,
            from: location.to_string(),
        };
    }
    GuardOutcome::Render
}

/// Where to go after a successful login.
pub fn post_login_target(from: Option<&str>) -> &str {
    match from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && path != routes::LOGIN => {
            path
        }
        _ => routes::DASHBOARD,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::client::storage::MemoryStorage;
    use crate::models::user::{AuthResponse, Role, UserResponse};

    #[test]
    fn loading_until_hydrated() {
        let session = SessionStore::new(MemoryStorage::new());
        assert_eq!(guard(&session, routes::DASHBOARD), GuardOutcome::Loading);
    }

    #[test]
    fn anonymous_is_redirected_with_origin() {
        let session = SessionStore::open(MemoryStorage::new());
        assert_eq!(
            guard(&session, routes::SETTINGS),
            GuardOutcome::Redirect {
                to: routes::LOGIN,
                from: routes::SETTINGS.to_string(),
            }
        );
    }

    #[test]
    fn signed_in_renders() {
        let mut session = SessionStore::open(MemoryStorage::new());
        session
            .login(&AuthResponse {
                access_token: "a.b.c".to_string(),
                refresh_token: "a.b.c".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 900,
                user: UserResponse {
                    id: 1,
                    email: "ada@example.com".to_string(),
                    name: None,
                    role: Role::User,
                    created_at: Utc::now(),
                },
            })
            .unwrap();
        assert_eq!(guard(&session, routes::PROFILE), GuardOutcome::Render);
    }

    #[test]
    fn post_login_target_prefers_origin() {
        assert_eq!(post_login_target(Some(routes::PROFILE)), routes::PROFILE);
        assert_eq!(post_login_target(Some(routes::LOGIN)), routes::DASHBOARD);
        assert_eq!(post_login_target(Some("https://evil.test")), routes::DASHBOARD);
        assert_eq!(post_login_target(None), routes::DASHBOARD);
    }
}
