/*
 * v2quote - Uniswap V2 swap quotes from raw pair storage
 * Main entry point for the application
 */

use rocket::figment::Figment;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use v2quote::{
    api,
    config::{Config, LogFormat, LoggingConfig},
    rpc::RpcClient,
    service::EstimateService,
    utils::pool,
};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.logging);

    info!("Starting v2quote swap estimation service");

    let rpc = RpcClient::new(
        &config.blockchain.rpc_url,
        config.blockchain.chain_id,
        config.blockchain.connection_pool_size,
        config.blockchain.request_timeout(),
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to Ethereum RPC: {}", e);
        e
    })?;

    let api_state = api::ApiState {
        estimate_service: Arc::new(EstimateService::new(Arc::new(rpc))),
        rate_limiter: api::RateLimiter::new(config.rate_limit.requests_per_minute),
    };

    info!("Starting API server on {}:{}", config.server.host, config.server.port);

    let rocket = api::create_rocket(api_state, server_figment(&config));
    rocket.launch().await?;

    let stats = pool::global().stats();
    info!(
        hit_rate = stats.hit_rate(),
        releases = stats.releases.load(Ordering::Relaxed),
        "Server shutdown completed"
    );
    Ok(())
}

fn server_figment(config: &Config) -> Figment {
    rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port))
        .merge(("shutdown.grace", config.server.shutdown_timeout_secs))
        .merge(("log_level", "critical"))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("v2quote={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
