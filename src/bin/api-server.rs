//! Market Bottom API Server
//!
//! Runs the refresh scheduler in the background and serves the latest
//! signal, settings and watchlist management over HTTP.

use dotenvy::dotenv;
use market_bottom::config::{get_environment, Config};
use market_bottom::core::http::{start_server, AppState};
use market_bottom::core::pipeline::SignalPipeline;
use market_bottom::core::scheduler::RefreshScheduler;
use market_bottom::logging;
use market_bottom::metrics::Metrics;
use market_bottom::models::universe::Universe;
use market_bottom::services::AlphaVantageProvider;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    let port = config.port;

    info!("Starting Market Bottom API Server");
    info!(environment = %get_environment(), "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);
    info!(
        refresh_interval_ms = config.refresh_interval.as_millis(),
        watchlist = ?config.watchlist,
        sectors = ?config.sectors,
        "Refresh settings"
    );
    if config.alpha_vantage_api_key.is_none() {
        warn!("ALPHA_VANTAGE_API_KEY not set, every cycle will use the fallback generator");
    }

    let metrics = Arc::new(Metrics::new()?);
    let provider = Arc::new(AlphaVantageProvider::from_config(&config));
    let pipeline =
        SignalPipeline::new(provider, config.fetch_timeout).with_metrics(metrics.clone());
    let scheduler = RefreshScheduler::new(
        pipeline,
        Universe::new(config.watchlist.clone(), config.sectors.clone()),
        config.refresh_interval,
    )
    .with_metrics(metrics.clone())
    .with_rng_seed(config.jitter_seed);

    scheduler.start().await;

    let state = AppState::new(scheduler.clone(), metrics);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            scheduler.stop().await;
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
            scheduler.stop().await;
        }
    }

    Ok(())
}
