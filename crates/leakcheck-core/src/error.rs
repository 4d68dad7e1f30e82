//! Configuration error types for the LeakCheck client.
//!
//! Everything that can go wrong before a request is built (locating the
//! credential file, parsing it, validating the key or the proxy) is reported
//! through [`ConfigError`].

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine the user's home directory
    #[error("could not determine home directory for the credential file")]
    NoHomeDir,

    /// I/O error reading/writing the credential file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the credential file
    #[error("failed to parse credential file: {0}")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize the credential file
    #[error("failed to serialize credential file: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No API key could be resolved from any source
    #[error(
        "API key is missing: pass it explicitly, set LEAKCHECK_APIKEY or store it in the config file"
    )]
    MissingKey,

    /// API key does not satisfy the variant's key policy
    #[error("API key is invalid: {reason}")]
    InvalidKey {
        /// Reason for invalidity
        reason: String,
    },

    /// Proxy URL could not be used
    #[error("invalid proxy '{proxy}': {reason}")]
    InvalidProxy {
        /// The rejected proxy value
        proxy: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Base URL of the service could not be used
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The key is fixed at construction for this API variant
    #[error("API key cannot be changed after construction for this API variant")]
    KeyImmutable,
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
