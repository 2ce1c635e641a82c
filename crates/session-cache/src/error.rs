//! Error types for session cache operations.

/// Error type for session cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The session store has not been started (or was destroyed).
    #[error("Session not started: start the session before using the cache")]
    SessionNotStarted,

    /// A cache was built without a logger.
    #[error("No logger configured for session cache")]
    MissingLogger,

    /// The namespace key holds something other than a map of entries.
    #[error("Session key '{namespace}' does not hold a cache namespace")]
    NamespaceNotAMap { namespace: String },

    /// A stored entry could not be decoded as `[value, expires_at]`.
    #[error("Corrupt cache entry for key '{key}': {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Encoding or decoding a typed value failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for session cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading cache configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
