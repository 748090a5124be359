//! Game Query API - game server status over HTTP.
//!
//! This binary parses the configuration, starts the rate limiter sweeper and
//! serves the router.

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_query_api::{
    config::Config,
    query::GamedigQuerier,
    server::{create_router_with_limiter, RateLimiter},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let router_config = config.router_config();

    info!("Game Query API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!(
        "  Rate limit: {} requests / {}ms per client",
        config.rate_limit_max, config.rate_limit_window_ms
    );
    info!("  Query timeout: {}ms", config.query_timeout_ms);
    info!("  Game types: {}", router_config.game_types.len());

    let limiter = RateLimiter::new(router_config.rate_limit.clone());
    spawn_limiter_sweeper(limiter.clone());

    let router = create_router_with_limiter(
        GamedigQuerier::with_timeout(config.query_timeout()),
        router_config,
        limiter,
    );

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening at http://{}", addr);
    info!("  Try: curl http://{}/minecraft/ip=127.0.0.1&port=25565", addr);

    if let Err(e) = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Periodically drop rate limit windows that have ended.
fn spawn_limiter_sweeper(limiter: RateLimiter) {
    let period = limiter.config().window;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            limiter.purge_expired();
        }
    });
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "game_query_api=debug,tower_http=debug"
    } else {
        "game_query_api=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
