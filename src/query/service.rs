//! Query dispatch.
//!
//! The [`QueryService`] hands a validated [`QueryRequest`] to a
//! [`GameQuerier`] exactly once and turns the result into a [`QueryOutcome`]:
//! the server status tagged `online: true`, or a failure envelope tagged
//! `online: false`.
//!
//! ```text
//! QueryRequest ──► QueryService::dispatch ──► GameQuerier::query
//!                         │                         │
//!                         │   timeout / failure     │  Ok(status)
//!                         ▼                         ▼
//!              Offline(ErrorEnvelope)       Online(status + online:true)
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::QueryError;

use super::request::QueryRequest;

/// Default upper bound on a single game server query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Status object returned by a game server query.
///
/// The shape depends on the game and the query library; it is passed through
/// untouched apart from the `online` flag.
pub type ServerStatus = Map<String, Value>;

// =============================================================================
// Game Querier
// =============================================================================

/// A capability that can ask a game server for its status.
///
/// Production code uses [`GamedigQuerier`](super::GamedigQuerier); tests plug
/// in mocks.
#[async_trait]
pub trait GameQuerier: Send + Sync + 'static {
    /// Query the server described by `request`.
    async fn query(&self, request: &QueryRequest) -> Result<ServerStatus, QueryError>;
}

#[async_trait]
impl<Q: GameQuerier + ?Sized> GameQuerier for Arc<Q> {
    async fn query(&self, request: &QueryRequest) -> Result<ServerStatus, QueryError> {
        (**self).query(request).await
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Body sent when a query fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Always false
    pub online: bool,

    /// `Failed to query the server: <reason>`
    pub error: String,
}

impl ErrorEnvelope {
    pub fn from_error(err: &QueryError) -> Self {
        Self {
            online: false,
            error: format!("Failed to query the server: {}", err),
        }
    }
}

/// Result of dispatching one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The server answered; the status carries `online: true`
    Online(ServerStatus),

    /// The query failed
    Offline(ErrorEnvelope),
}

impl QueryOutcome {
    pub fn is_online(&self) -> bool {
        matches!(self, QueryOutcome::Online(_))
    }
}

// =============================================================================
// Query Service
// =============================================================================

/// Dispatches validated requests to a [`GameQuerier`].
pub struct QueryService<Q: GameQuerier> {
    querier: Q,
    timeout: Duration,
}

impl<Q: GameQuerier> QueryService<Q> {
    /// Create a service with the default timeout.
    pub fn new(querier: Q) -> Self {
        Self::with_timeout(querier, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(querier: Q, timeout: Duration) -> Self {
        Self { querier, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn querier(&self) -> &Q {
        &self.querier
    }

    /// Query the server once; never retries.
    pub async fn dispatch(&self, request: &QueryRequest) -> QueryOutcome {
        let result = match tokio::time::timeout(self.timeout, self.querier.query(request)).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(self.timeout.as_millis() as u64)),
        };

        match result {
            Ok(mut status) => {
                debug!(
                    game = %request.game_type,
                    host = %request.host,
                    port = request.port,
                    "Server answered"
                );
                status.insert("online".to_string(), Value::Bool(true));
                QueryOutcome::Online(status)
            }
            Err(err) => {
                warn!(
                    game = %request.game_type,
                    host = %request.host,
                    port = request.port,
                    "Query failed: {}",
                    err
                );
                QueryOutcome::Offline(ErrorEnvelope::from_error(&err))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
