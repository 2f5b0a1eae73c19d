//! Error types for clientdash-core

use thiserror::Error;

/// Main error type for the clientdash-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Sheet export could not be fetched
    #[error("sheet error: {0}")]
    Sheet(String),

    /// Chat webhook setup error
    #[error("chat error: {0}")]
    Chat(String),
}

/// Result type alias for clientdash-core
pub type Result<T> = std::result::Result<T, Error>;
