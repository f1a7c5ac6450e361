//! Server and client configuration loaded from environment variables.

pub mod roles;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_access_token_expiry_secs: i64,
    pub jwt_refresh_token_expiry_secs: i64,
    pub frontend_url: String,
    pub tls: Option<TlsConfig>,
}

/// PEM certificate and key used when serving HTTPS.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_access_token_expiry_secs: env::var("JWT_ACCESS_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
            jwt_refresh_token_expiry_secs: env::var("JWT_REFRESH_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "604800".to_string())
                .parse()
                .unwrap_or(604800),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            tls: match (env::var("TLS_CERT_PATH"), env::var("TLS_KEY_PATH")) {
                (Ok(cert), Ok(key)) => Some(TlsConfig {
                    cert_path: cert.into(),
                    key_path: key.into(),
                }),
                _ => None,
            },
        })
    }
}

/// Client configuration for the CLI front end.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the dashboard API, without trailing slash.
    pub api_url: String,
    /// File backing the persisted auth session.
    pub session_path: PathBuf,
    /// How long a fetched query result is served from cache.
    pub stale_time: Duration,
    /// Extra attempts after a failed request.
    pub retries: u32,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("OPSBOARD_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            session_path: env::var("OPSBOARD_SESSION_PATH")
                .unwrap_or_else(|_| ".opsboard-session.json".to_string())
                .into(),
            stale_time: Duration::from_secs(
                env::var("OPSBOARD_STALE_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .unwrap_or(300),
            ),
            retries: env::var("OPSBOARD_RETRIES")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
        }
    }
}
