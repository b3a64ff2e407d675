//! Error types for ilm-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for ilm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ilm-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed user input (tag expression, date, day count, size)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Mutually exclusive options were set together
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A rule or policy violates a structural invariant
    #[error("Invalid lifecycle rule: {0}")]
    Validation(String),

    /// Resource not found (rule id, bucket)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid target path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Feature not supported by backend
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Parse(_) | Error::Validation(_) => 2, // UsageError
            Error::InvalidPath(_) | Error::Config(_) => 2, // UsageError
            Error::Network(_) => 3,                      // NetworkError
            Error::Auth(_) => 4,                         // AuthError
            Error::NotFound(_) | Error::AliasNotFound(_) => 5, // NotFound
            Error::Conflict(_) => 6,                     // Conflict
            Error::UnsupportedFeature(_) => 7,           // UnsupportedFeature
            _ => 1,                                      // GeneralError
        }
    }
}
