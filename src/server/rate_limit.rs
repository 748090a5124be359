//! Per-client request rate limiting.
//!
//! Each client (keyed by peer IP address) gets a fixed window of
//! `window` duration, opened by its first request. Within a window at most
//! `max` requests are let through; the rest are answered with `429 Too Many
//! Requests` and the configured message, before any validation or query work.
//!
//! # Headers
//!
//! When enabled, every response passing through the middleware carries:
//!
//! ```text
//! X-RateLimit-Limit:     120
//! X-RateLimit-Remaining: 117
//! X-RateLimit-Reset:     1735689600     (Unix seconds when the window ends)
//! Retry-After:           42             (rejections only)
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use tracing::debug;

/// Default window length (1 minute).
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Default number of requests allowed per client per window.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 120;

/// Default body of a rejected request.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

// =============================================================================
// Configuration
// =============================================================================

/// Rate limit settings. Immutable once the server starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Length of a counting window
    pub window: Duration,

    /// Requests allowed per client within one window
    pub max: u32,

    /// Body sent with 429 responses
    pub message: String,

    /// Whether to send the `X-RateLimit-*` headers
    pub headers_enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_RATE_LIMIT_WINDOW,
            max: DEFAULT_RATE_LIMIT_MAX,
            message: DEFAULT_RATE_LIMIT_MESSAGE.to_string(),
            headers_enabled: true,
        }
    }
}

// =============================================================================
// Limiter
// =============================================================================

/// Identity a request is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKey {
    Ip(IpAddr),
    /// No peer address available; all such requests share one bucket
    Unknown,
}

impl ClientKey {
    /// Derive the key from the peer address recorded by the server.
    pub fn from_request(request: &Request) -> Self {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| ClientKey::Ip(addr.ip()))
            .unwrap_or(ClientKey::Unknown)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Result of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,

    /// Configured maximum per window
    pub limit: u32,

    /// Requests left in the current window
    pub remaining: u32,

    /// Time until the current window ends
    pub reset_after: Duration,
}

/// Fixed-window request counter shared by all connections.
///
/// Cloning shares the underlying counters.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: Arc<RateLimitConfig>,
    windows: Arc<DashMap<ClientKey, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config: Arc::new(config),
            windows: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request from `key` and decide whether it may proceed.
    pub fn check(&self, key: ClientKey) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: ClientKey, now: Instant) -> RateLimitDecision {
        let window_len = self.config.window;
        let mut entry = self.windows.entry(key).or_insert(Window {
            started: now,
            hits: 0,
        });

        if now.duration_since(entry.started) >= window_len {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }
        entry.hits = entry.hits.saturating_add(1);

        let elapsed = now.duration_since(entry.started);
        RateLimitDecision {
            allowed: entry.hits <= self.config.max,
            limit: self.config.max,
            remaining: self.config.max.saturating_sub(entry.hits),
            reset_after: window_len.saturating_sub(elapsed),
        }
    }

    /// Drop windows that have ended.
    pub fn purge_expired(&self) {
        self.purge_expired_at(Instant::now());
    }

    fn purge_expired_at(&self, now: Instant) {
        let window_len = self.config.window;
        self.windows
            .retain(|_, window| now.duration_since(window.started) < window_len);
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware that enforces the rate limit.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use game_query_api::server::rate_limit::{rate_limit_middleware, RateLimiter, RateLimitConfig};
///
/// let limiter = RateLimiter::new(RateLimitConfig::default());
/// let app = Router::new()
///     .route("/{game}/{*target}", get(handler))
///     .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
/// ```
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = ClientKey::from_request(&request);
    let decision = limiter.check(key);
    let headers_enabled = limiter.config().headers_enabled;

    if !decision.allowed {
        debug!(
            client = ?key,
            limit = decision.limit,
            "Rate limit exceeded"
        );
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            limiter.config().message.clone(),
        )
            .into_response();
        if headers_enabled {
            let headers = response.headers_mut();
            insert_quota_headers(headers, &decision);
            headers.insert(
                header::RETRY_AFTER,
                HeaderValue::from(ceil_secs(decision.reset_after)),
            );
        }
        return response;
    }

    let mut response = next.run(request).await;
    if headers_enabled {
        insert_quota_headers(response.headers_mut(), &decision);
    }
    response
}

fn insert_quota_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    let reset_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .saturating_add(decision.reset_after);

    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(ceil_secs(reset_at)));
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

// =============================================================================
// Tests
// =============================================================================
