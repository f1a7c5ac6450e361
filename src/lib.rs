pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod tools;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use config::roles::RoleRights;
use store::UserStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: config::AppConfig,
    pub rights: Arc<RoleRights>,
}
