//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::config::roles::RoleRights;
use crate::config::AppConfig;
use crate::models::user::{Role, User};
use crate::services::auth;
use crate::store::memory::MemoryUserStore;
use crate::AppState;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: String::new(),
        database_max_connections: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret-key-for-jwt".to_string(),
        jwt_access_token_expiry_secs: 900,
        jwt_refresh_token_expiry_secs: 604800,
        frontend_url: "http://localhost:5173".to_string(),
        tls: None,
    }
}

pub fn test_state(store: Arc<MemoryUserStore>, rights: RoleRights) -> AppState {
    AppState {
        store,
        config: test_config(),
        rights: Arc::new(rights),
    }
}

/// Access token for `user` signed with the test secret.
pub fn access_token_for(user: &User) -> String {
    let config = test_config();
    auth::issue_tokens(
        user.clone(),
        &config.jwt_secret,
        config.jwt_access_token_expiry_secs,
        config.jwt_refresh_token_expiry_secs,
    )
    .unwrap()
    .access_token
}

pub fn user_with_role(id: i64, role: Role) -> User {
    let now = chrono::Utc::now();
    User {
        id,
        email: format!("user{id}@example.com"),
        name: None,
        password_hash: String::new(),
        role,
        created_at: now,
        updated_at: now,
    }
}
