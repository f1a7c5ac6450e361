//! User store port and its adapters.
//!
//! Services talk to the user table through [`UserStore`] so the aggregation
//! and auth logic can run against Postgres in production and an in-memory
//! table in tests.

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::user::{NewUser, User};

/// Errors raised by user store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Total number of user rows.
    async fn count_users(&self) -> Result<i64, StoreError>;

    /// Number of users whose `created_at` is at or after `cutoff`.
    async fn count_users_created_since(&self, cutoff: DateTime<Utc>) -> Result<i64, StoreError>;

    /// The `limit` most recently created users, newest first.
    async fn recent_users(&self, limit: i64) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user. Duplicate email yields [`StoreError::Conflict`].
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
