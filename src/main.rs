use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use opsboard::config::roles::RoleRights;
use opsboard::config::AppConfig;
use opsboard::store::PgUserStore;
use opsboard::{db, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opsboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid BACKEND_HOST: {}", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    let tls = config.tls.clone();

    let state = AppState {
        store: Arc::new(PgUserStore::new(pool)),
        config,
        rights: Arc::new(RoleRights::standard()),
    };
    let app = routes::router(state);

    match tls {
        Some(tls) => {
            // Ignore the error: a provider may already be installed by a dependency.
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
            let rustls_config =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                    .await
                    .context("Failed to load TLS certificate")?;
            tracing::info!(host = %addr, "Starting Opsboard API server (TLS)");
            axum_server::bind_rustls(addr, rustls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(host = %addr, "Starting Opsboard API server");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
