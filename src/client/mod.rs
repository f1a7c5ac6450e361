//! Client side of the dashboard: persisted auth session, route guard and
//! the cached query layer used by the CLI.

pub mod api;
pub mod guard;
pub mod session;
pub mod storage;

/// Errors raised while persisting the session.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage write could not be committed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("not signed in")]
    NotAuthenticated,
}
