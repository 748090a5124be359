use thiserror::Error;

/// Errors raised while querying a game server.
///
/// The `Display` text is what ends up in the `error` field of the failure
/// envelope, after the `Failed to query the server: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query library reported a failure (refused, malformed reply, ...)
    #[error("{0}")]
    Failed(String),

    /// The game type passed validation but the query library has no definition for it
    #[error("Game type '{0}' is not supported by the query library")]
    UnsupportedGame(String),

    /// The hostname could not be resolved to an address
    #[error("Could not resolve host '{host}': {message}")]
    Resolve { host: String, message: String },

    /// The query did not complete within the configured timeout
    #[error("Query timed out after {0}ms")]
    Timeout(u64),

    /// The blocking query task panicked or was cancelled
    #[error("Query task failed: {0}")]
    Join(String),
}

/// Errors in the startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric setting must be greater than zero
    #[error("{0} must be greater than 0")]
    Zero(&'static str),

    /// The rate limit rejection message is empty
    #[error("rate limit message must not be empty")]
    EmptyMessage,

    /// The documentation URL is empty
    #[error("docs URL must not be empty")]
    EmptyDocsUrl,
}
