//! Game server query pipeline.
//!
//! ```text
//! raw path params ──► QueryRequest::validate ──► QueryService::dispatch ──► QueryOutcome
//!                            │                           │
//!                   AllowedGameTypes               GameQuerier
//!                                               (GamedigQuerier / mocks)
//! ```
//!
//! - [`QueryRequest`]: validated game, host and port
//! - [`ValidationErrors`]: field-level errors in the order game, ip, port
//! - [`QueryService`]: single, time-bounded call to a [`GameQuerier`]
//! - [`QueryOutcome`]: the status with `online: true`, or an [`ErrorEnvelope`]

mod gamedig_source;
mod games;
mod host;
mod request;
mod service;

pub use gamedig_source::{gamedig_id, GamedigQuerier};
pub use games::{AllowedGameTypes, DEFAULT_GAME_TYPES};
pub use host::{escape_html, is_fqdn, is_ip, is_valid_host};
pub use request::{
    parse_port, FieldError, QueryRequest, ValidationErrors, GAME_NOT_SUPPORTED, INVALID_HOST,
    INVALID_PORT,
};
pub use service::{
    ErrorEnvelope, GameQuerier, QueryOutcome, QueryService, ServerStatus, DEFAULT_QUERY_TIMEOUT,
};
