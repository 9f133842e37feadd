//! Error types for wayfinder

use thiserror::Error;

/// Failure kinds produced while resolving locations, searching places or
/// planning routes.
///
/// Cloneable so a single outcome can be handed to every caller waiting on
/// the same in-flight lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Empty or malformed caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a failure status or nothing usable
    #[error("Provider error: {0}")]
    Provider(String),

    /// A coordinate string could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl MapError {
    /// Short machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
        }
    }
}

/// Main error type for wayfinder operations
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for wayfinder operations
pub type Result<T> = std::result::Result<T, Error>;
