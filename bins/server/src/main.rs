//! `maleta` HTTP server: loads configuration, opens the pool and serves the
//! accounting API.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maleta_api::{AppState, create_router};
use maleta_db::connect;
use maleta_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside development.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maleta=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database).await?;
    info!(max_connections = config.database.max_connections, "Database pool ready");

    info!(
        base_currency = %config.accounting.base_currency,
        vat_rate = %config.accounting.vat_rate,
        fx_noise_threshold = %config.accounting.fx_noise_threshold,
        "Accounting policy loaded"
    );
    let state = AppState::new(db, config.accounting).context("Invalid accounting policy")?;

    let app = create_router(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
