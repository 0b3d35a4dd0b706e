use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sensor_aggregator::app::{self, AppState};
use sensor_aggregator::auth::JwtValidator;
use sensor_aggregator::config::AppConfig;
use sensor_aggregator::upstream::HttpDataClient;

#[derive(Parser)]
#[command(name = "sensor-aggregator")]
#[command(about = "Aggregation gateway exposing user-scoped sensor data")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Data adapter base URL (overrides DATA_ADAPTER_URL)")]
    data_adapter_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATA_ADAPTER_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.data_adapter_url {
        config.upstream.base_url = url;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting sensor aggregator in {:?} mode", config.environment);

    let upstream = Arc::new(HttpDataClient::new(&config.upstream)?);
    let jwt = JwtValidator::new(&config.security.jwt_secret)?;
    let router = app::router(AppState::new(upstream, jwt), &config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        data_adapter = %config.upstream.base_url,
        timeout_ms = config.upstream.timeout_ms,
        "Sensor aggregator listening on http://{}",
        bind_addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Sensor aggregator stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
