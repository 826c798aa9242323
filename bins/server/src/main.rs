//! Bizdir API Server
//!
//! Main entry point for the business directory backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bizdir_api::{AppState, create_router};
use bizdir_db::{SeaOrmCompanyRepository, SeaOrmFinancialReportRepository, connect};
use bizdir_shared::config::LogConfig;
use bizdir_shared::{AppConfig, JwtConfig, JwtService};

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(log.json.then(|| fmt::layer().json()))
        .with((!log.json).then(fmt::layer))
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log);

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let state = AppState::new(
        Arc::new(SeaOrmFinancialReportRepository::new(db.clone())),
        Arc::new(SeaOrmCompanyRepository::new(db)),
        jwt_service,
    )
    .with_max_period_quarters(config.server.max_period_quarters);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
