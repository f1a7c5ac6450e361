//! In-memory user table for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{StoreError, UserStore};
use crate::models::user::{NewUser, Role, User};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    failing: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row with an explicit creation time.
    pub fn seed(&self, email: &str, name: Option<&str>, created_at: DateTime<Utc>) -> User {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            name: name.map(str::to_string),
            password_hash: String::new(),
            role: Role::User,
            created_at,
            updated_at: created_at,
        };
        users.push(user.clone());
        user
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn count_users(&self) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn count_users_created_since(&self, cutoff: DateTime<Utc>) -> Result<i64, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| u.created_at >= cutoff).count() as i64)
    }

    async fn recent_users(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new_user: &NewUser) -> Result<User, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict("Email already taken".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: users.len() as i64 + 1,
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
