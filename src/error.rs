//! Error types for site navigation

use thiserror::Error;

/// Main error type for navigation operations
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Page location is unavailable")]
    MissingLocation,

    #[error("Invalid page location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to install listener: {0}")]
    Listener(String),

    #[error("Browser environment unavailable: {0}")]
    Environment(&'static str),
}

/// Result type for navigation operations
pub type NavResult<T> = Result<T, NavError>;
