//! Route definitions for the Opsboard API.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod tools;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let origin = match HeaderValue::from_str(&state.config.frontend_url) {
        Ok(value) => AllowOrigin::exact(value),
        Err(e) => {
            tracing::warn!(
                error = %e,
                url = %state.config.frontend_url,
                "Invalid FRONTEND_URL, CORS disabled"
            );
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let health_routes = Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready));

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let dashboard_routes = Router::new()
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/recent-activity", get(dashboard::recent_activity));

    let tool_routes = Router::new()
        .route("/tools", get(tools::list))
        .route("/tools/{id}", post(tools::invoke));

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(dashboard_routes)
        .merge(tool_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
