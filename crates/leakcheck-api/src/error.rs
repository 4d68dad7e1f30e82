//! Error types for the LeakCheck API client.

use crate::variant::ApiVariant;
use leakcheck_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while talking to the LeakCheck API.
#[derive(Error, Debug)]
pub enum LeakCheckError {
    /// Credential or client configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Request parameters rejected before sending
    #[error("invalid request: {0}")]
    Validation(String),

    /// Network error
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response did not have the expected status or envelope shape
    #[error("unexpected response (status {status}): {message}")]
    Protocol {
        /// HTTP status code
        status: u16,
        /// What was wrong with the response
        message: String,
    },

    /// The server reported a failure
    #[error("API error: {message}")]
    Api {
        /// Error message from the envelope
        message: String,
    },

    /// An authenticated call was attempted without a key
    #[error("API key is missing, use set_key() or specify it in the config")]
    MissingKey,

    /// Operation is not available on the selected API variant
    #[error("{operation} is not supported by the {variant} API")]
    Unsupported {
        /// Operation that was attempted
        operation: String,
        /// Variant the client is configured for
        variant: ApiVariant,
    },
}

impl LeakCheckError {
    /// Message reported by the server, if this is an API error.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message } => Some(message),
            _ => None,
        }
    }
}

/// Result type alias for LeakCheck operations.
pub type Result<T> = std::result::Result<T, LeakCheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LeakCheckError::Protocol {
            status: 502,
            message: "response is not valid JSON".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected response (status 502): response is not valid JSON"
        );

        let err = LeakCheckError::Unsupported {
            operation: "limits".to_string(),
            variant: ApiVariant::Public,
        };
        assert_eq!(err.to_string(), "limits is not supported by the public API");
    }

    #[test]
    fn test_api_message() {
        let err = LeakCheckError::Api {
            message: "Rate limit exceeded".to_string(),
        };
        assert_eq!(err.api_message(), Some("Rate limit exceeded"));
        assert_eq!(LeakCheckError::MissingKey.api_message(), None);
    }

    #[test]
    fn test_error_from_config() {
        let err: LeakCheckError = ConfigError::MissingKey.into();
        assert!(matches!(err, LeakCheckError::Config(ConfigError::MissingKey)));
    }
}
