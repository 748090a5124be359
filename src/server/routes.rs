//! Router configuration for the game query API.
//!
//! # Route Structure
//!
//! ```text
//! /                               - Redirect to documentation (public)
//! /health                         - Health check (public)
//! /{game}/ip={ip}&port={port}     - Query a game server (rate limited)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use game_query_api::query::GamedigQuerier;
//! use game_query_api::server::routes::{create_router, RouterConfig};
//!
//! let router = create_router(GamedigQuerier::new(), RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(
//!     listener,
//!     router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
//! )
//! .await?;
//! ```

use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, not_found_handler, query_handler, root_handler, AppState, DEFAULT_DOCS_URL,
};
use super::rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimiter};
use crate::query::{AllowedGameTypes, GameQuerier, QueryService, DEFAULT_QUERY_TIMEOUT};

// =============================================================================
// Router Configuration
// =============================================================================

/// Immutable settings for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Game types accepted by the validator
    pub game_types: AllowedGameTypes,

    /// Per-client rate limit for the query route
    pub rate_limit: RateLimitConfig,

    /// Upper bound on a single game server query
    pub query_timeout: Duration,

    /// Redirect target for `GET /`
    pub docs_url: String,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    /// Built-in allowlist, 120 requests/minute, 10 second query timeout,
    /// tracing enabled.
    fn default() -> Self {
        Self {
            game_types: AllowedGameTypes::default(),
            rate_limit: RateLimitConfig::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            docs_url: DEFAULT_DOCS_URL.to_string(),
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    pub fn with_game_types(mut self, game_types: AllowedGameTypes) -> Self {
        self.game_types = game_types;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = docs_url.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router with a fresh rate limiter.
pub fn create_router<Q: GameQuerier>(querier: Q, config: RouterConfig) -> Router {
    let limiter = RateLimiter::new(config.rate_limit.clone());
    create_router_with_limiter(querier, config, limiter)
}

/// Create the application router around an existing rate limiter.
///
/// Use this when the caller needs a handle on the limiter, e.g. to purge
/// expired windows periodically.
pub fn create_router_with_limiter<Q: GameQuerier>(
    querier: Q,
    config: RouterConfig,
    limiter: RateLimiter,
) -> Router {
    let query_service = QueryService::with_timeout(querier, config.query_timeout);
    let app_state = AppState::new(query_service, config.game_types).with_docs_url(&config.docs_url);

    // The limiter only guards the query route, and runs before extraction and validation
    let query_routes = Router::new()
        .route("/{game}/{*target}", get(query_handler::<Q>))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));

    let router = Router::new()
        .route("/", get(root_handler::<Q>))
        .route("/health", get(health_handler))
        .merge(query_routes)
        .fallback(not_found_handler)
        .with_state(app_state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
