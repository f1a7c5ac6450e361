//! Authenticated session view model backed by [`AuthStorage`].
//!
//! The store is created once per process, hydrated from storage before any
//! protected page is shown, and then mutated only through [`SessionStore::login`]
//! and [`SessionStore::logout`]. The in-memory user is only replaced after the
//! storage batch that backs it has been written.

use super::storage::{AuthStorage, ACCESS_TOKEN_KEY, AUTH_KEYS, REFRESH_TOKEN_KEY, USER_KEY};
use super::ClientError;
use crate::models::user::{AuthResponse, UserResponse};

#[derive(Debug)]
pub struct SessionStore<S: AuthStorage> {
    storage: S,
    user: Option<UserResponse>,
    access_token: Option<String>,
    loading: bool,
}

/// Why persisted state could not be restored.
#[derive(Debug, thiserror::Error)]
enum RestoreError {
    #[error("stored user is not valid JSON: {0}")]
    User(#[from] serde_json::Error),

    #[error("stored access token is malformed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Storage(#[from] super::StorageError),
}

impl<S: AuthStorage> SessionStore<S> {
    /// An empty, not yet hydrated session.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            user: None,
            access_token: None,
            loading: true,
        }
    }

    /// Construct and hydrate in one step.
    pub fn open(storage: S) -> Self {
        let mut session = Self::new(storage);
        session.hydrate();
        session
    }

    /// Restore the session from storage. Runs once; later calls are no-ops.
    ///
    /// Anything short of a parseable user plus a well-formed access token
    /// leaves the session empty and wipes the persisted auth keys.
    pub fn hydrate(&mut self) {
        if !self.loading {
            return;
        }

        match self.restore() {
            Ok(Some((user, token))) => {
                tracing::debug!(user_id = user.id, "Session restored");
                self.user = Some(user);
                self.access_token = Some(token);
            }
            Ok(None) => self.clear_persisted(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding stored session");
                self.clear_persisted();
            }
        }

        self.loading = false;
    }

    fn restore(&self) -> Result<Option<(UserResponse, String)>, RestoreError> {
        let (Some(raw_user), Some(token)) = (
            self.storage.get(USER_KEY)?,
            self.storage.get(ACCESS_TOKEN_KEY)?,
        ) else {
            return Ok(None);
        };
        let user: UserResponse = serde_json::from_str(&raw_user)?;
        jsonwebtoken::decode_header(&token)?;
        Ok(Some((user, token)))
    }

    fn clear_persisted(&mut self) {
        if let Err(e) = self.storage.remove_many(&AUTH_KEYS) {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
    }

    /// Persist `auth` and make its user current.
    ///
    /// On a storage failure nothing in memory changes.
    pub fn login(&mut self, auth: &AuthResponse) -> Result<(), ClientError> {
        let user_json = serde_json::to_string(&auth.user).map_err(super::StorageError::from)?;
        self.storage.set_many(&[
            (USER_KEY, user_json),
            (ACCESS_TOKEN_KEY, auth.access_token.clone()),
            (REFRESH_TOKEN_KEY, auth.refresh_token.clone()),
        ])?;

        self.user = Some(auth.user.clone());
        self.access_token = Some(auth.access_token.clone());
        Ok(())
    }

    /// Remove every persisted auth key and forget the current user.
    ///
    /// On a storage failure the session stays signed in, matching what a
    /// reload would restore.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.storage.remove_many(&AUTH_KEYS)?;
        self.user = None;
        self.access_token = None;
        Ok(())
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True until [`hydrate`](Self::hydrate) has run.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::client::storage::{FileStorage, MemoryStorage};
    use crate::client::StorageError;
    use crate::models::user::Role;

    // header.payload.signature with a decodable HS256 header
    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxIn0.c2ln";

    fn auth_response() -> AuthResponse {
        AuthResponse {
            access_token: TOKEN.to_string(),
            refresh_token: TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 900,
            user: UserResponse {
                id: 1,
                email: "ada@example.com".to_string(),
                name: Some("Ada".to_string()),
                role: Role::User,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn loading_flips_once() {
        let mut session = SessionStore::new(MemoryStorage::new());
        assert!(session.is_loading());
        session.hydrate();
        assert!(!session.is_loading());
        session.hydrate();
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn login_survives_reload() {
        let mut session = SessionStore::open(MemoryStorage::new());
        let auth = auth_response();
        session.login(&auth).unwrap();
        assert!(session.is_authenticated());

        let reloaded = SessionStore::open(session.into_storage());
        assert_eq!(reloaded.user(), Some(&auth.user));
        assert_eq!(reloaded.access_token(), Some(TOKEN));
    }

    #[test]
    fn logout_survives_reload() {
        let mut session = SessionStore::open(MemoryStorage::new());
        session.login(&auth_response()).unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());

        let reloaded = SessionStore::open(session.into_storage());
        assert!(!reloaded.is_authenticated());
        for key in AUTH_KEYS {
            assert_eq!(reloaded.storage().get(key).unwrap(), None);
        }
    }

    #[test]
    fn logout_when_logged_out_is_a_no_op() {
        let mut session = SessionStore::open(MemoryStorage::new());
        session.logout().unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn malformed_user_clears_storage() {
        let mut storage = MemoryStorage::new();
        storage
            .set_many(&[
                (USER_KEY, "{broken".to_string()),
                (ACCESS_TOKEN_KEY, TOKEN.to_string()),
                (REFRESH_TOKEN_KEY, TOKEN.to_string()),
            ])
            .unwrap();

        let session = SessionStore::open(storage);
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        for key in AUTH_KEYS {
            assert_eq!(session.storage().get(key).unwrap(), None);
        }
    }

    #[test]
    fn malformed_token_clears_storage() {
        let mut storage = MemoryStorage::new();
        let user = serde_json::to_string(&auth_response().user).unwrap();
        storage
            .set_many(&[(USER_KEY, user), (ACCESS_TOKEN_KEY, "opaque".to_string())])
            .unwrap();

        let session = SessionStore::open(storage);
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn user_without_token_is_logged_out() {
        let mut storage = MemoryStorage::new();
        let user = serde_json::to_string(&auth_response().user).unwrap();
        storage.set_many(&[(USER_KEY, user)]).unwrap();

        let session = SessionStore::open(storage);
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(USER_KEY).unwrap(), None);
    }

    /// Storage whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStorage(MemoryStorage);

    impl AuthStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set_many(&mut self, _: &[(&str, String)]) -> Result<(), StorageError> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }

        fn remove_many(&mut self, keys: &[&str]) -> Result<(), StorageError> {
            self.0.remove_many(keys)
        }
    }

    #[test]
    fn failed_login_write_leaves_session_untouched() {
        let mut session = SessionStore::open(ReadOnlyStorage::default());
        assert!(session.login(&auth_response()).is_err());
        assert!(!session.is_authenticated());
        assert_eq!(session.access_token(), None);
    }

    /// Accepts writes but refuses to delete anything.
    #[derive(Default)]
    struct StickyStorage(MemoryStorage);

    impl AuthStorage for StickyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
            self.0.set_many(entries)
        }

        fn remove_many(&mut self, _: &[&str]) -> Result<(), StorageError> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }
    }

    #[test]
    fn failed_logout_keeps_session_signed_in() {
        let mut session = SessionStore::open(StickyStorage::default());
        let auth = auth_response();
        session.login(&auth).unwrap();

        assert!(session.logout().is_err());
        assert!(session.is_authenticated());
        assert_eq!(session.access_token(), Some(TOKEN));

        let reloaded = SessionStore::open(session.into_storage());
        assert_eq!(reloaded.user(), Some(&auth.user));
        assert!(reloaded.is_authenticated());
    }

    #[test]
    fn file_backed_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let auth = auth_response();

        let mut session = SessionStore::open(FileStorage::new(&path));
        session.login(&auth).unwrap();
        drop(session);

        let reloaded = SessionStore::open(FileStorage::new(&path));
        assert_eq!(reloaded.user(), Some(&auth.user));
    }
}
