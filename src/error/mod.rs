//! Error types for the agent runtime.

use thiserror::Error;

/// Primary error type for all agent runtime operations.
///
/// Chat transports return these values; the [`Agent`](crate::agent::Agent)
/// turns them into `Failed` turn results instead of propagating them.
#[derive(Error, Debug)]
pub enum ConferentiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },
}

impl ConferentiError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error for a domain record.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConferentiError>;
