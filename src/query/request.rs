//! Query request validation.
//!
//! Turns the raw `game`, `ip` and `port` path parameters into a
//! [`QueryRequest`], or into the list of field errors explaining why not.
//! Every check runs; errors are reported in the order game, ip, port.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::games::AllowedGameTypes;
use super::host::{escape_html, is_valid_host};

pub const GAME_NOT_SUPPORTED: &str = "Game is not supported.";
pub const INVALID_HOST: &str = "Invalid IP address or hostname.";
pub const INVALID_PORT: &str = "Invalid port number.";

// =============================================================================
// Query Request
// =============================================================================

/// A validated game server query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Game identifier, a member of the allowlist
    pub game_type: String,

    /// IP literal or FQDN, trimmed and HTML-escaped
    pub host: String,

    /// Server port
    pub port: u16,
}

impl QueryRequest {
    /// Validate raw path parameters against the allowlist.
    pub fn validate(
        game: &str,
        ip: &str,
        port: &str,
        games: &AllowedGameTypes,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if !games.contains(game) {
            errors.push(FieldError::new("game", GAME_NOT_SUPPORTED));
        }

        let host = if is_valid_host(ip) {
            Some(escape_html(ip.trim()))
        } else {
            errors.push(FieldError::new("ip", INVALID_HOST));
            None
        };

        let port = match parse_port(port) {
            Some(port) => Some(port),
            None => {
                errors.push(FieldError::new("port", INVALID_PORT));
                None
            }
        };

        match (host, port) {
            (Some(host), Some(port)) if errors.is_empty() => Ok(Self {
                game_type: game.to_string(),
                host,
                port,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse a base-10 port in `1..=65535`.
///
/// An optional leading sign and leading zeros are accepted, so `+25565` and
/// `025565` are both port 25565.
pub fn parse_port(value: &str) -> Option<u16> {
    let digits = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() || value.starts_with('-') {
        return None;
    }

    significant.parse::<u16>().ok()
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single rejected parameter.
///
/// Serializes as a one-entry object, `{"<field>": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field, self.message)?;
        map.end()
    }
}

/// Ordered list of field errors. Empty means the input was valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Names of the rejected fields, in report order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

// =============================================================================
// Tests
// =============================================================================
