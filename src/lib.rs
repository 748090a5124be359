//! # Game Query API
//!
//! A small HTTP API that queries game servers and returns their status as JSON.
//!
//! Each request runs one pipeline:
//!
//! ```text
//! rate limit ──► validate game/ip/port ──► query the server ──► pretty JSON
//!    429               400                        │
//!                                         200 online:true
//!                                         500 online:false
//! ```
//!
//! The protocol work is delegated to the `gamedig` crate behind the
//! [`GameQuerier`] trait, so the pipeline can be exercised without a network.
//!
//! ## Modules
//!
//! - [`query`] - Validation, the allowlist and query dispatch
//! - [`server`] - Axum handlers, rate limiting, response formatting and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use game_query_api::{create_router, GamedigQuerier, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = create_router(GamedigQuerier::new(), RouterConfig::default());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(
//!         listener,
//!         router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
//!     )
//!     .await
//!     .unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, QueryError};
pub use query::{
    AllowedGameTypes, ErrorEnvelope, FieldError, GameQuerier, GamedigQuerier, QueryOutcome,
    QueryRequest, QueryService, ServerStatus, ValidationErrors,
};
pub use server::{
    create_router, create_router_with_limiter, AppState, ClientKey, RateLimitConfig,
    RateLimiter, RouterConfig,
};
