//! HTTP request handlers for the game query API.
//!
//! # Endpoints
//!
//! - `GET /` - Redirect to the documentation
//! - `GET /{game}/ip={ip}&port={port}` - Query a game server
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::{header, StatusCode, Uri};
use serde::Serialize;
use tracing::debug;

use crate::query::{AllowedGameTypes, GameQuerier, QueryRequest, QueryService};

use super::response::{outcome_response, validation_response};

/// Where `GET /` redirects to.
pub const DEFAULT_DOCS_URL: &str = "https://github.com/HexaneNetworks/gamedig-api";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<Q: GameQuerier> {
    /// Dispatches validated queries
    pub query_service: Arc<QueryService<Q>>,

    /// Game types accepted by the validator
    pub game_types: AllowedGameTypes,

    /// Redirect target for the root path
    pub docs_url: Arc<str>,
}

impl<Q: GameQuerier> AppState<Q> {
    pub fn new(query_service: QueryService<Q>, game_types: AllowedGameTypes) -> Self {
        Self {
            query_service: Arc::new(query_service),
            game_types,
            docs_url: Arc::from(DEFAULT_DOCS_URL),
        }
    }

    pub fn with_docs_url(mut self, docs_url: impl AsRef<str>) -> Self {
        self.docs_url = Arc::from(docs_url.as_ref());
        self
    }
}

impl<Q: GameQuerier> Clone for AppState<Q> {
    fn clone(&self) -> Self {
        Self {
            query_service: Arc::clone(&self.query_service),
            game_types: self.game_types.clone(),
            docs_url: Arc::clone(&self.docs_url),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response for requests that never reach the query pipeline.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Path Parsing
// =============================================================================

/// Split a query path into its game and target segments, percent-decoded.
///
/// Invalid UTF-8 in an escape is replaced rather than rejected, so a garbled
/// host still reaches validation and gets its field error.
pub fn split_query_path(path: &str) -> Option<(String, String)> {
    let path = path.strip_prefix('/')?;
    let (game, target) = path.split_once('/')?;
    if game.is_empty() || target.is_empty() {
        return None;
    }
    Some((decode_lossy(game), decode_lossy(target)))
}

fn decode_lossy(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

/// Split the `ip=<host>&port=<port>` tail of a query path.
///
/// The host runs up to the first `&port=` that is followed by a non-empty
/// port, so hosts containing `&` still parse. A single trailing `/` is ignored.
pub fn split_target(target: &str) -> Option<(&str, &str)> {
    const PORT_MARKER: &str = "&port=";

    let target = target.strip_prefix('/').unwrap_or(target);
    let target = target.strip_suffix('/').unwrap_or(target);
    let rest = target.strip_prefix("ip=")?;

    let mut from = 0;
    while let Some(offset) = rest[from..].find(PORT_MARKER) {
        let at = from + offset;
        let port = &rest[at + PORT_MARKER.len()..];
        if at > 0 && !port.is_empty() {
            return Some((&rest[..at], port));
        }
        from = at + 1;
    }
    None
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle game server queries.
///
/// # Endpoint
///
/// `GET /{game}/ip={ip}&port={port}`
///
/// # Response
///
/// - `200 OK`: the server status with `"online": true`
/// - `400 Bad Request`: array of `{field: message}` objects
/// - `404 Not Found`: the path tail is not `ip=...&port=...`
/// - `500 Internal Server Error`: `{"online": false, "error": "Failed to query the server: ..."}`
///
/// Bodies are pretty-printed JSON with `Content-Type: application/json`.
pub async fn query_handler<Q: GameQuerier>(
    State(state): State<AppState<Q>>,
    uri: Uri,
) -> Response {
    let Some((game, target)) = split_query_path(uri.path()) else {
        return not_found_response(uri.path());
    };
    let Some((ip, port)) = split_target(&target) else {
        return not_found_response(uri.path());
    };

    let request = match QueryRequest::validate(&game, ip, port, &state.game_types) {
        Ok(request) => request,
        Err(errors) => {
            debug!(
                game = %game,
                fields = ?errors.fields(),
                "Rejected query parameters"
            );
            return validation_response(errors);
        }
    };

    let outcome = state.query_service.dispatch(&request).await;
    outcome_response(outcome)
}

/// Handle `GET /` by redirecting (302) to the documentation.
pub async fn root_handler<Q: GameQuerier>(State(state): State<AppState<Q>>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.docs_url.to_string())],
    )
        .into_response()
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found_handler(uri: Uri) -> Response {
    not_found_response(uri.path())
}

fn not_found_response(path: &str) -> Response {
    let status = StatusCode::NOT_FOUND;
    debug!(path = path, "No route");
    let body = ErrorResponse::with_status("not_found", format!("Cannot GET {}", path), status);
    (status, Json(body)).into_response()
}

// =============================================================================
// Tests
// =============================================================================
