//! Core error types for pomodoro-core.
//!
//! Nothing in the timer engine itself is fatal: these errors surface from the
//! storage port, the TOML host configuration, the quote source and the
//! notification sink, and callers on the engine path log and swallow them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Quote source errors
    #[error("Quote source error: {0}")]
    Quotes(#[from] QuoteError),
}

/// Errors raised by a [`crate::storage::KeyValueStore`] implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Could not resolve or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),

    /// The store refused the write (used by test doubles and read-only stores)
    #[error("Store is unavailable: {0}")]
    Unavailable(String),
}

/// Host configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors while loading the external quote source.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The source string is neither a readable path nor an http(s) URL
    #[error("Unsupported quote source: {0}")]
    UnsupportedSource(String),

    /// HTTP fetch failed
    #[error("Failed to fetch quotes: {0}")]
    Fetch(#[from] reqwest::Error),

    /// File read failed
    #[error("Failed to read quotes from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload was not an array of `{text, author}`
    #[error("Malformed quote payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Delivery failure reported by a [`crate::notify::NotificationSink`].
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The platform refused to show the notification
    #[error("Notification permission denied")]
    PermissionDenied,

    /// No audio/notification backend is available
    #[error("Notification backend unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
