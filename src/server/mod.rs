//! HTTP server layer for the game query API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │              GET /{game}/ip={ip}&port={port}                    │
//! │                                                                 │
//! │  ┌────────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐   │
//! │  │ rate_limit │─►│  handlers  │─►│ response  │  │  routes   │   │
//! │  │ (429 gate) │  │ (validate, │  │ (pretty   │  │ (router   │   │
//! │  │            │  │  dispatch) │  │  JSON)    │  │  config)  │   │
//! │  └────────────┘  └────────────┘  └───────────┘  └───────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod rate_limit;
pub mod response;
pub mod routes;

pub use handlers::{
    health_handler, not_found_handler, query_handler, root_handler, split_query_path, split_target,
    AppState, ErrorResponse, HealthResponse, DEFAULT_DOCS_URL,
};
pub use rate_limit::{
    rate_limit_middleware, ClientKey, RateLimitConfig, RateLimitDecision, RateLimiter,
    DEFAULT_RATE_LIMIT_MAX, DEFAULT_RATE_LIMIT_MESSAGE, DEFAULT_RATE_LIMIT_WINDOW,
};
pub use response::{outcome_response, validation_response, PrettyJson};
pub use routes::{create_router, create_router_with_limiter, RouterConfig};
