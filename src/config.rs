//! Configuration management for the game query API.
//!
//! All settings have compiled-in defaults; the only environment variable read
//! is `PORT`, which selects the listening port.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use game_query_api::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! println!("Listening on {}", config.bind_address());
//! ```

use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::query::{AllowedGameTypes, DEFAULT_QUERY_TIMEOUT};
use crate::server::{
    RateLimitConfig, RouterConfig, DEFAULT_DOCS_URL, DEFAULT_RATE_LIMIT_MAX,
    DEFAULT_RATE_LIMIT_MESSAGE, DEFAULT_RATE_LIMIT_WINDOW,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = DEFAULT_RATE_LIMIT_WINDOW.as_secs() * 1000;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = DEFAULT_QUERY_TIMEOUT.as_secs() * 1000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Game Query API - game server status as JSON.
///
/// Queries game servers on behalf of HTTP clients and returns their status as
/// pretty-printed JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "game-query-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Where `GET /` redirects to.
    #[arg(long, default_value = DEFAULT_DOCS_URL)]
    pub docs_url: String,

    // =========================================================================
    // Rate Limit Configuration
    // =========================================================================
    /// Length of the rate limit window in milliseconds.
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT_WINDOW_MS)]
    pub rate_limit_window_ms: u64,

    /// Requests allowed per client within one window.
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT_MAX)]
    pub rate_limit_max: u32,

    /// Body of the 429 response.
    #[arg(long, default_value = DEFAULT_RATE_LIMIT_MESSAGE)]
    pub rate_limit_message: String,

    /// Send X-RateLimit-* headers.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub rate_limit_headers: bool,

    // =========================================================================
    // Query Configuration
    // =========================================================================
    /// Upper bound on a single game server query, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_QUERY_TIMEOUT_MS)]
    pub query_timeout_ms: u64,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_window_ms == 0 {
            return Err(ConfigError::Zero("rate_limit_window_ms"));
        }
        if self.rate_limit_max == 0 {
            return Err(ConfigError::Zero("rate_limit_max"));
        }
        if self.rate_limit_message.trim().is_empty() {
            return Err(ConfigError::EmptyMessage);
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Zero("query_timeout_ms"));
        }
        if self.docs_url.trim().is_empty() {
            return Err(ConfigError::EmptyDocsUrl);
        }
        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            window: Duration::from_millis(self.rate_limit_window_ms),
            max: self.rate_limit_max,
            message: self.rate_limit_message.clone(),
            headers_enabled: self.rate_limit_headers,
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Build the immutable router settings.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig::default()
            .with_game_types(AllowedGameTypes::default())
            .with_rate_limit(self.rate_limit())
            .with_query_timeout(self.query_timeout())
            .with_docs_url(self.docs_url.clone())
            .with_tracing(!self.no_tracing)
    }
}

// =============================================================================
// Tests
// =============================================================================
