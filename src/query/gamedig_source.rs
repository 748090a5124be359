//! Game querier backed by the `gamedig` crate.
//!
//! `gamedig` speaks the actual game protocols; this adapter resolves the host,
//! looks up the game definition, runs the blocking query on tokio's blocking
//! pool and converts the common response into a JSON object.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use gamedig::games::GAMES;
use gamedig::TimeoutSettings;
use serde_json::Value;
use tracing::debug;

use crate::error::QueryError;

use super::request::QueryRequest;
use super::service::{GameQuerier, ServerStatus, DEFAULT_QUERY_TIMEOUT};

/// Short names accepted by the API and the `gamedig` identifier they stand for.
const GAME_ALIASES: &[(&str, &str)] = &[
    ("7d2d", "sdtd"),
    ("arma2", "a2oa"),
    ("counterstrike15", "counterstrike"),
    ("counterstrike16", "counterstrike"),
    ("cs", "counterstrike"),
    ("gmod", "garrysmod"),
    ("hl2dm", "hl2d"),
    ("tf2", "teamfortress2"),
    ("ut", "unrealtournament"),
];

/// Map an API game type onto its `gamedig` identifier.
pub fn gamedig_id(game_type: &str) -> &str {
    GAME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == game_type)
        .map_or(game_type, |&(_, id)| id)
}

/// Production [`GameQuerier`] using `gamedig`.
///
/// Socket connect, read and write are each bounded by `timeout`, so a query
/// abandoned by the dispatcher does not hold a blocking thread much longer.
#[derive(Debug, Clone, Copy)]
pub struct GamedigQuerier {
    timeout: Duration,
}

impl Default for GamedigQuerier {
    fn default() -> Self {
        Self::new()
    }
}

impl GamedigQuerier {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true if `gamedig` has a definition for `game_type` or its alias.
    pub fn supports(game_type: &str) -> bool {
        GAMES.get(gamedig_id(game_type)).is_some()
    }

    fn timeout_settings(&self) -> Result<TimeoutSettings, QueryError> {
        let bound = Some(self.timeout);
        TimeoutSettings::new(bound, bound, bound, 0).map_err(|e| QueryError::Failed(e.to_string()))
    }
}

#[async_trait]
impl GameQuerier for GamedigQuerier {
    async fn query(&self, request: &QueryRequest) -> Result<ServerStatus, QueryError> {
        let game = GAMES
            .get(gamedig_id(&request.game_type))
            .ok_or_else(|| QueryError::UnsupportedGame(request.game_type.clone()))?;
        let timeout_settings = self.timeout_settings()?;

        let address = resolve_host(&request.host, request.port).await?;
        let port = request.port;

        debug!(
            game = %request.game_type,
            id = gamedig_id(&request.game_type),
            address = %address,
            port = port,
            "Querying game server"
        );

        let response = tokio::task::spawn_blocking(move || {
            gamedig::query_with_timeout(game, &address, Some(port), Some(timeout_settings))
                .map_err(|e| QueryError::Failed(e.to_string()))
                .and_then(|response| {
                    serde_json::to_value(response.as_json())
                        .map_err(|e| QueryError::Failed(e.to_string()))
                })
        })
        .await
        .map_err(|e| QueryError::Join(e.to_string()))??;

        match response {
            Value::Object(status) => Ok(status),
            other => Err(QueryError::Failed(format!(
                "Unexpected response shape: {}",
                other
            ))),
        }
    }
}

/// Resolve a host to an IP address, skipping DNS for literals.
async fn resolve_host(host: &str, port: u16) -> Result<IpAddr, QueryError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| QueryError::Resolve {
            host: host.to_string(),
            message: e.to_string(),
        })?;

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| QueryError::Resolve {
            host: host.to_string(),
            message: "no addresses found".to_string(),
        })
}
