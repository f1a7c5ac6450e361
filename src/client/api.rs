//! HTTP query layer for the dashboard API.
//!
//! Each query result is cached for `stale_time`; failed queries are retried
//! `retries` more times before the last error is returned to the caller.
//! Mutations (login, register) are sent exactly once.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ClientError;
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::models::dashboard::{ActivityItem, DashboardStats};
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest};

#[derive(Debug)]
struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

/// Single-slot cache that treats entries older than `stale_time` as missing.
#[derive(Debug)]
struct QueryCache<T> {
    slot: Option<Cached<T>>,
}

impl<T: Clone> QueryCache<T> {
    fn new() -> Self {
        Self { slot: None }
    }

    fn fresh(&self, stale_time: Duration) -> Option<T> {
        self.slot
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < stale_time)
            .map(|c| c.value.clone())
    }

    fn store(&mut self, value: T) {
        self.slot = Some(Cached {
            value,
            fetched_at: Instant::now(),
        });
    }

    fn clear(&mut self) {
        self.slot = None;
    }
}

#[derive(Debug)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
    stale_time: Duration,
    retries: u32,
    stats: QueryCache<DashboardStats>,
    activity: QueryCache<Vec<ActivityItem>>,
}

impl DashboardClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.clone(),
            stale_time: config.stale_time,
            retries: config.retries,
            stats: QueryCache::new(),
            activity: QueryCache::new(),
        }
    }

    /// Drop cached query results, e.g. after the signed-in user changes.
    pub fn invalidate(&mut self) {
        self.stats.clear();
        self.activity.clear();
    }

    pub async fn stats(&mut self, token: &str) -> Result<DashboardStats, ClientError> {
        if let Some(stats) = self.stats.fresh(self.stale_time) {
            return Ok(stats);
        }
        let stats: DashboardStats = self.get_authed("/dashboard/stats", token).await?;
        self.stats.store(stats.clone());
        Ok(stats)
    }

    pub async fn recent_activity(&mut self, token: &str) -> Result<Vec<ActivityItem>, ClientError> {
        if let Some(activity) = self.activity.fresh(self.stale_time) {
            return Ok(activity);
        }
        let activity: Vec<ActivityItem> =
            self.get_authed("/dashboard/recent-activity", token).await?;
        self.activity.store(activity.clone());
        Ok(activity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/auth/login", &body).await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.map(str::to_string),
        };
        self.post("/auth/register", &body).await
    }

    async fn get_authed<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        self.send_with_retry(|| self.http.get(&url).bearer_auth(token)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        Self::send_once(self.http.post(&url).json(body)).await
    }

    async fn send_with_retry<T, F>(&self, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match Self::send_once(build()).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "Request failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response.json().await?);
        }
        Err(api_error(response).await)
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let message = match response.json::<ApiError>().await {
        Ok(body) => body.message,
        Err(_) => "unexpected response".to_string(),
    };
    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use super::*;
    use crate::models::dashboard::PercentChanges;

    fn sample_stats() -> DashboardStats {
        DashboardStats {
            total_users: 4,
            active_users: 2,
            total_revenue: 10.0,
            conversion_rate: 1.0,
            percent_changes: PercentChanges {
                users: 0.0,
                revenue: 0.0,
                conversion_rate: 0.0,
            },
        }
    }

    /// Serve `/dashboard/stats`, failing the first `failures` requests.
    /// `/auth/login` always rejects the credentials. Both count into `hits`.
    async fn spawn_server(failures: usize) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/dashboard/stats",
                get(
                    move |State(hits): State<Arc<AtomicUsize>>| async move {
                        let n = hits.fetch_add(1, Ordering::SeqCst);
                        if n < failures {
                            return Err((
                                StatusCode::INTERNAL_SERVER_ERROR,
                                Json(ApiError::new("INTERNAL_ERROR", "boom")),
                            ));
                        }
                        Ok(Json(sample_stats()))
                    },
                ),
            )
            .route(
                "/auth/login",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(ApiError::new("UNAUTHORIZED", "Invalid credentials")),
                    )
                }),
            )
            .route(
                "/dashboard/recent-activity",
                get(|| async { Json(Vec::<ActivityItem>::new()) }),
            )
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), hits)
    }

    fn client(base_url: String, stale_secs: u64, retries: u32) -> DashboardClient {
        DashboardClient::new(&ClientConfig {
            api_url: base_url,
            session_path: "unused".into(),
            stale_time: Duration::from_secs(stale_secs),
            retries,
        })
    }

    #[tokio::test]
    async fn fresh_results_are_served_from_cache() {
        let (url, hits) = spawn_server(0).await;
        let mut client = client(url, 300, 1);

        assert_eq!(client.stats("t").await.unwrap(), sample_stats());
        assert_eq!(client.stats("t").await.unwrap(), sample_stats());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        client.invalidate();
        client.stats("t").await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_stale_time_always_refetches() {
        let (url, hits) = spawn_server(0).await;
        let mut client = client(url, 0, 0);
        client.stats("t").await.unwrap();
        client.stats("t").await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn one_failure_is_retried() {
        let (url, hits) = spawn_server(1).await;
        let mut client = client(url, 300, 1);
        assert_eq!(client.stats("t").await.unwrap(), sample_stats());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn error_surfaces_after_retries_exhausted() {
        let (url, hits) = spawn_server(5).await;
        let mut client = client(url, 300, 1);
        let err = client.stats("t").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, ref message } if message == "boom"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejected_login_is_sent_once() {
        let (url, hits) = spawn_server(0).await;
        let client = client(url, 300, 1);
        let err = client.login("a@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 401, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_activity_feed_decodes() {
        let (url, _) = spawn_server(0).await;
        let mut client = client(url, 300, 1);
        assert!(client.recent_activity("t").await.unwrap().is_empty());
    }
}
